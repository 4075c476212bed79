//! Report rendering for the command-line front end.

pub mod generator;

pub use generator::{
    generate_json_report, generate_markdown_report, generate_pillar_markdown_report,
    write_report,
};
