use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::StudentNo)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::RealName).string().not_null())
                    .col(ColumnDef::new(Users::ClassCode).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::Courses)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::SessionNonce).string().null())
                    .col(
                        ColumnDef::new(Users::RenameCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 作业表
        manager
            .create_table(
                Table::create()
                    .table(Homeworks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Homeworks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Homeworks::ClassCode).string().not_null())
                    .col(
                        ColumnDef::new(Homeworks::CourseCode)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Homeworks::Title).string().not_null())
                    .col(ColumnDef::new(Homeworks::Description).text().null())
                    .col(ColumnDef::new(Homeworks::PublishTime).big_integer().not_null())
                    .col(ColumnDef::new(Homeworks::Deadline).big_integer().not_null())
                    .col(ColumnDef::new(Homeworks::TotalScore).double().not_null())
                    .col(ColumnDef::new(Homeworks::Status).string().not_null())
                    .col(ColumnDef::new(Homeworks::FolderName).string().not_null())
                    .col(ColumnDef::new(Homeworks::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Homeworks::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Homeworks::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 提交记录表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::HomeworkId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::ClassCode).string().not_null())
                    .col(ColumnDef::new(Submissions::SubmittedAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(Submissions::FirstSubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::FileUrl).string().null())
                    .col(ColumnDef::new(Submissions::FileName).string().null())
                    .col(ColumnDef::new(Submissions::Score).double().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::Remarks).text().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::HomeworkId)
                            .to(Homeworks::Table, Homeworks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 提交标记表（只记录是否已提交）
        manager
            .create_table(
                Table::create()
                    .table(SubmissionMarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionMarks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionMarks::HomeworkId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionMarks::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionMarks::Status).string().not_null())
                    .col(
                        ColumnDef::new(SubmissionMarks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionMarks::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubmissionMarks::Table, SubmissionMarks::HomeworkId)
                            .to(Homeworks::Table, Homeworks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束：每个学生每个作业只有一条提交记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_submissions_student_homework")
                    .table(Submissions::Table)
                    .col(Submissions::StudentId)
                    .col(Submissions::HomeworkId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_submission_marks_homework_student")
                    .table(SubmissionMarks::Table)
                    .col(SubmissionMarks::HomeworkId)
                    .col(SubmissionMarks::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_class_code_role")
                    .table(Users::Table)
                    .col(Users::ClassCode)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_homeworks_deadline")
                    .table(Homeworks::Table)
                    .col(Homeworks::Deadline)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(SubmissionMarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Homeworks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    StudentNo,
    Email,
    PasswordHash,
    RealName,
    ClassCode,
    Role,
    Courses,
    Status,
    SessionNonce,
    RenameCount,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Homeworks {
    #[sea_orm(iden = "homeworks")]
    Table,
    Id,
    ClassCode,
    CourseCode,
    Title,
    Description,
    PublishTime,
    Deadline,
    TotalScore,
    Status,
    FolderName,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    StudentId,
    HomeworkId,
    ClassCode,
    SubmittedAt,
    FirstSubmittedAt,
    FileUrl,
    FileName,
    Score,
    Feedback,
    Status,
    Remarks,
    GradedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubmissionMarks {
    #[sea_orm(iden = "submission_marks")]
    Table,
    Id,
    HomeworkId,
    StudentId,
    Status,
    CreatedAt,
    UpdatedAt,
}
