#![allow(dead_code)]

pub mod aelens_env;
pub mod listings;
