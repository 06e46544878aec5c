use super::*;

mod bookmarks;
mod search;
