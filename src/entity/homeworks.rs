//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "homeworks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_code: String,
    pub course_code: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub publish_time: i64,
    pub deadline: i64,
    #[sea_orm(column_type = "Double")]
    pub total_score: f64,
    pub status: String,
    pub folder_name: String,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
    #[sea_orm(has_many = "super::submission_marks::Entity")]
    SubmissionMarks,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::submission_marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionMarks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_homework(self) -> crate::models::homeworks::entities::Homework {
        use crate::models::homeworks::entities::{Homework, HomeworkStatus};
        use chrono::{DateTime, Utc};

        Homework {
            id: self.id,
            class_code: self.class_code,
            course_code: self.course_code,
            title: self.title,
            description: self.description,
            publish_time: DateTime::<Utc>::from_timestamp(self.publish_time, 0).unwrap_or_default(),
            deadline: DateTime::<Utc>::from_timestamp(self.deadline, 0).unwrap_or_default(),
            total_score: self.total_score,
            status: self
                .status
                .parse::<HomeworkStatus>()
                .unwrap_or(HomeworkStatus::Draft),
            folder_name: self.folder_name,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
