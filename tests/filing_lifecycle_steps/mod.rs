//! Step definitions for filing lifecycle scenarios.


mod given;
mod then;
mod when;
