mod common;
mod profiles;
