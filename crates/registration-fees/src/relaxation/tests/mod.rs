mod catalog;
mod common;
mod guard;
mod service;
