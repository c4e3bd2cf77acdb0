mod anthropic;
mod cohere;
mod registry;
mod support;
