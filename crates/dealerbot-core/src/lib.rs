//! Intent-to-query core of the dealership support bot.
//!
//! Free text goes through [`agents::intent::classify`] to a
//! [`query::descriptor::QueryDescriptor`], which [`query::execute::Executor`]
//! validates against the [`schema::registry::SchemaRegistry`] and runs
//! against a [`store::RecordStore`]. [`reply::format::format_reply`] turns the
//! outcome into the text sent back to the customer.

pub mod agents;
pub mod llm;
pub mod pipeline;
pub mod query;
pub mod reply;
pub mod schema;
pub mod store;
