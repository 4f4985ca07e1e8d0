//! 预导入模块，方便使用

pub use super::homeworks::{
    ActiveModel as HomeworkActiveModel, Entity as Homeworks, Model as HomeworkModel,
};
pub use super::submission_marks::{
    ActiveModel as SubmissionMarkActiveModel, Entity as SubmissionMarks,
    Model as SubmissionMarkModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
