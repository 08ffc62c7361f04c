pub mod descriptor;
pub mod execute;
pub mod numerals;
pub mod render;
