use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Title,
    Bio,
    Location,
    Phone,
    AvatarUrl,
    ResumeUrl,
    GithubUrl,
    LinkedinUrl,
    TwitterUrl,
    WebsiteUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    LookupKey,
    Description,
    Icon,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
    Name,
    LookupKey,
    CategoryId,
    Proficiency,
    YearsOfExperience,
    Icon,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Experiences {
    Table,
    Id,
    Company,
    Position,
    LookupKey,
    Location,
    EmploymentType,
    StartDate,
    EndDate,
    IsCurrent,
    Description,
    Responsibilities,
    Technologies,
    CompanyUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Educations {
    Table,
    Id,
    Institution,
    Degree,
    LookupKey,
    FieldOfStudy,
    Location,
    StartDate,
    EndDate,
    Grade,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Title,
    LookupKey,
    Description,
    Technologies,
    GithubUrl,
    LiveUrl,
    ImageUrl,
    Featured,
    Status,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

fn timestamps<T: Iden + 'static>(table: &mut TableCreateStatement, created: T, updated: T) {
    table
        .col(ColumnDef::new(created).timestamp_with_time_zone().not_null())
        .col(ColumnDef::new(updated).timestamp_with_time_zone().not_null());
}

/// Natural-key uniqueness, enforced on the normalized `lookup_key` column.
async fn unique_lookup_key<T, C>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
    column: C,
) -> Result<(), DbErr>
where
    T: Iden + 'static,
    C: Iden + 'static,
{
    manager
        .create_index(
            Index::create()
                .name(name)
                .table(table)
                .col(column)
                .unique()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        let mut users = Table::create();
        users
            .table(Users::Table)
            .if_not_exists()
            .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Users::Name).string().not_null())
            .col(ColumnDef::new(Users::Email).string().not_null())
            .col(ColumnDef::new(Users::PasswordHash).string().not_null())
            .col(ColumnDef::new(Users::Title).string().null())
            .col(ColumnDef::new(Users::Bio).text().null())
            .col(ColumnDef::new(Users::Location).string().null())
            .col(ColumnDef::new(Users::Phone).string().null())
            .col(ColumnDef::new(Users::AvatarUrl).string().null())
            .col(ColumnDef::new(Users::ResumeUrl).string().null())
            .col(ColumnDef::new(Users::GithubUrl).string().null())
            .col(ColumnDef::new(Users::LinkedinUrl).string().null())
            .col(ColumnDef::new(Users::TwitterUrl).string().null())
            .col(ColumnDef::new(Users::WebsiteUrl).string().null());
        timestamps(&mut users, Users::CreatedAt, Users::UpdatedAt);
        manager.create_table(users.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // categories
        let mut categories = Table::create();
        categories
            .table(Categories::Table)
            .if_not_exists()
            .col(ColumnDef::new(Categories::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Categories::Name).string().not_null())
            .col(ColumnDef::new(Categories::LookupKey).string().not_null())
            .col(ColumnDef::new(Categories::Description).text().null())
            .col(ColumnDef::new(Categories::Icon).string().null())
            .col(
                ColumnDef::new(Categories::SortOrder)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Categories::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        timestamps(&mut categories, Categories::CreatedAt, Categories::UpdatedAt);
        manager.create_table(categories.to_owned()).await?;
        unique_lookup_key(
            manager,
            "ux_categories_lookup_key",
            Categories::Table,
            Categories::LookupKey,
        )
        .await?;

        // skills
        let mut skills = Table::create();
        skills
            .table(Skills::Table)
            .if_not_exists()
            .col(ColumnDef::new(Skills::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Skills::Name).string().not_null())
            .col(ColumnDef::new(Skills::LookupKey).string().not_null())
            .col(ColumnDef::new(Skills::CategoryId).uuid().not_null())
            .col(
                ColumnDef::new(Skills::Proficiency)
                    .small_integer()
                    .not_null()
                    .default(50),
            )
            .col(ColumnDef::new(Skills::YearsOfExperience).small_integer().null())
            .col(ColumnDef::new(Skills::Icon).string().null())
            .col(
                ColumnDef::new(Skills::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_skills_category_id")
                    .from(Skills::Table, Skills::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        timestamps(&mut skills, Skills::CreatedAt, Skills::UpdatedAt);
        manager.create_table(skills.to_owned()).await?;
        unique_lookup_key(manager, "ux_skills_lookup_key", Skills::Table, Skills::LookupKey)
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_skills_category_id")
                    .table(Skills::Table)
                    .col(Skills::CategoryId)
                    .to_owned(),
            )
            .await?;

        // experiences
        let mut experiences = Table::create();
        experiences
            .table(Experiences::Table)
            .if_not_exists()
            .col(ColumnDef::new(Experiences::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Experiences::Company).string().not_null())
            .col(ColumnDef::new(Experiences::Position).string().not_null())
            .col(ColumnDef::new(Experiences::LookupKey).string().not_null())
            .col(ColumnDef::new(Experiences::Location).string().null())
            .col(
                ColumnDef::new(Experiences::EmploymentType)
                    .string()
                    .not_null()
                    .default("full-time"),
            )
            .col(ColumnDef::new(Experiences::StartDate).date().not_null())
            .col(ColumnDef::new(Experiences::EndDate).date().null())
            .col(
                ColumnDef::new(Experiences::IsCurrent)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Experiences::Description).text().null())
            .col(ColumnDef::new(Experiences::Responsibilities).json().not_null())
            .col(ColumnDef::new(Experiences::Technologies).json().not_null())
            .col(ColumnDef::new(Experiences::CompanyUrl).string().null())
            .col(
                ColumnDef::new(Experiences::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        timestamps(&mut experiences, Experiences::CreatedAt, Experiences::UpdatedAt);
        manager.create_table(experiences.to_owned()).await?;
        unique_lookup_key(
            manager,
            "ux_experiences_lookup_key",
            Experiences::Table,
            Experiences::LookupKey,
        )
        .await?;

        // educations
        let mut educations = Table::create();
        educations
            .table(Educations::Table)
            .if_not_exists()
            .col(ColumnDef::new(Educations::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Educations::Institution).string().not_null())
            .col(ColumnDef::new(Educations::Degree).string().not_null())
            .col(ColumnDef::new(Educations::LookupKey).string().not_null())
            .col(ColumnDef::new(Educations::FieldOfStudy).string().null())
            .col(ColumnDef::new(Educations::Location).string().null())
            .col(ColumnDef::new(Educations::StartDate).date().not_null())
            .col(ColumnDef::new(Educations::EndDate).date().null())
            .col(ColumnDef::new(Educations::Grade).string().null())
            .col(ColumnDef::new(Educations::Description).text().null())
            .col(
                ColumnDef::new(Educations::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        timestamps(&mut educations, Educations::CreatedAt, Educations::UpdatedAt);
        manager.create_table(educations.to_owned()).await?;
        unique_lookup_key(
            manager,
            "ux_educations_lookup_key",
            Educations::Table,
            Educations::LookupKey,
        )
        .await?;

        // projects
        let mut projects = Table::create();
        projects
            .table(Projects::Table)
            .if_not_exists()
            .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Projects::Title).string().not_null())
            .col(ColumnDef::new(Projects::LookupKey).string().not_null())
            .col(ColumnDef::new(Projects::Description).text().not_null())
            .col(ColumnDef::new(Projects::Technologies).json().not_null())
            .col(ColumnDef::new(Projects::GithubUrl).string().null())
            .col(ColumnDef::new(Projects::LiveUrl).string().null())
            .col(ColumnDef::new(Projects::ImageUrl).string().null())
            .col(
                ColumnDef::new(Projects::Featured)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Projects::Status)
                    .string()
                    .not_null()
                    .default("completed"),
            )
            .col(
                ColumnDef::new(Projects::SortOrder)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Projects::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        timestamps(&mut projects, Projects::CreatedAt, Projects::UpdatedAt);
        manager.create_table(projects.to_owned()).await?;
        unique_lookup_key(manager, "ux_projects_lookup_key", Projects::Table, Projects::LookupKey)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_table(Table::drop().table(Projects::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Educations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Experiences::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_skills_category_id")
                    .table(Skills::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_users_email")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
