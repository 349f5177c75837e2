pub mod time_parse;
