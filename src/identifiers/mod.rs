/*! Language identification.

Identification is delegated to an external [Oracle] subprocess
(by default [fasttext](https://fasttext.cc) with the `lid.176` model),
whose answers are parsed into [Identification]s.

[naija] is a keyword-based Nigerian Pidgin scorer that speaks the same protocol. !*/
mod identification;
pub mod naija;
mod oracle;

pub use identification::Identification;
pub use oracle::Oracle;
