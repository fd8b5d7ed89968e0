mod page;
mod post;
mod taxonomy;
mod user;

pub use self::{
    page::Page,
    post::Post,
    taxonomy::{Category, Tag},
    user::User,
};
