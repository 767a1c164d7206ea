// Handlers for the `citymap` subcommands. main.rs parses arguments and
// dispatches here.

pub mod cities;
pub mod route;
