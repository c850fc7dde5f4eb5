pub mod command_input;
