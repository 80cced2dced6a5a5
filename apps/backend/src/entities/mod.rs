pub mod categories;
pub mod educations;
pub mod experiences;
pub mod projects;
pub mod skills;
pub mod users;

mod string_list;

pub use categories::Entity as Categories;
pub use categories::Model as Category;
pub use educations::Entity as Educations;
pub use educations::Model as Education;
pub use experiences::Entity as Experiences;
pub use experiences::Model as Experience;
pub use projects::Entity as Projects;
pub use projects::Model as Project;
pub use skills::Entity as Skills;
pub use skills::Model as Skill;
pub use string_list::StringList;
pub use users::Entity as Users;
pub use users::Model as User;
