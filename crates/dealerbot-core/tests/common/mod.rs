#![allow(dead_code)]

pub mod utilities;
