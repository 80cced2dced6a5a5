mod bulk;
mod categories;
mod education;
mod experience;
mod projects;
mod skills;
