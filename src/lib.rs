//! tabsift – an in-memory CSV explorer and question-answering engine.
//!
//! A [`session::Session`] owns one loaded tabular dataset and answers
//! free-text questions about it. The interesting part is query resolution:
//! input text is classified into exactly one recognized shape (aggregate,
//! row count, unique values, or filter-plus-top-N), its parameters are
//! extracted and coerced into typed values, and the shape is executed
//! against the column store. Text starting with `sql:` skips recognition
//! entirely and runs verbatim against an in-memory SQLite rendition of the
//! dataset bound under the table name `df`.
//!
//! ## Modules
//! * [`store`] – the tabular store: dataset ownership, CSV parsing with
//!   column-wise type inference, previews.
//! * [`datatype`] – the [`datatype::Value`] typed scalar, the total coercion
//!   function, and the comparison policy used by filters.
//! * [`resolve`] – the pattern matcher: an ordered `(Regex, builder)` table
//!   producing a [`resolve::RecognizedQuery`].
//! * [`execute`] – the query executor, including the SQLite pass-through.
//! * [`profile`] – schema / statistics / missingness / correlations.
//! * [`chart`] – one/two-column projections for external renderers.
//! * [`session`] – the session context object and its bounded interaction log.
//! * [`server`] – axum HTTP surface over a shared session.
//!
//! ## Quick Start
//! ```
//! use tabsift::session::Session;
//! use tabsift::store::LoadOptions;
//! use tabsift::execute::Answer;
//! use tabsift::datatype::Value;
//!
//! let mut session = Session::new();
//! session
//!     .load(b"city,price\noslo,10\nbergen,30\n", "prices.csv", &LoadOptions::default())
//!     .unwrap();
//! let answer = session.ask("average of price").unwrap();
//! assert_eq!(answer, Answer::Scalar(Value::Float(20.0)));
//! ```
//!
//! ## Error policy
//! Missing datasets, unknown chart columns, malformed uploads, bad casts and
//! SQL failures are all distinguishable [`error::TabsiftError`] variants that
//! surface to the immediate caller; nothing is retried. One legacy quirk is
//! kept on purpose: ask() shapes that name a nonexistent column answer with
//! a plain `Column '<name>' not found.` message result rather than an error.

pub mod chart;
pub mod datatype;
pub mod error;
pub mod execute;
pub mod profile;
pub mod resolve;
pub mod server;
pub mod session;
pub mod store;
