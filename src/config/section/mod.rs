//! Configuration section definitions.
//!
//! Each module corresponds to a section in `xspf.toml`:
//!
//! | Module  | TOML Section | Purpose                                   |
//! |---------|--------------|-------------------------------------------|
//! | `read`  | `[read]`     | Base override and resolution policies     |
//! | `write` | `[write]`    | Output base, root `xml:base`, indentation |

mod read;
mod write;

pub use read::ReadConfig;
pub use write::WriteConfig;
