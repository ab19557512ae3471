//! The record text format.
//!
//! This module only holds documentation. It describes the grammar read by
//! [`parse`](crate::parse) and the canonical form written by
//! [`to_string`](crate::to_string).
//!
//! # Lines and indentation
//!
//! The format is line-oriented. Nesting is expressed by indentation: a block
//! nested under `key:` or a bare `-` is one indentation unit deeper than its
//! parent. The unit is two spaces by default (see
//! [`Options::indent`](crate::Options::indent)).
//!
//! - Each leading tab expands to one unit before indentation is compared.
//! - A tab that follows spaces in the leading whitespace is an error.
//! - Blank lines are skipped.
//! - `#` outside a quoted run starts a comment that runs to the end of the
//!   line.
//!
//! A line indented less than its block expects ends that block. This is not
//! an error: the line is handed back to the enclosing block, which may read
//! it as one of its own entries. Badly indented input can therefore lose
//! structure without failing.
//!
//! ```text
//! cardTypes:          # mapping entry with a nested block
//!   funds:
//!     title: Funds
//!     iconPath: "res://assets/funds.png"
//! ```
//!
//! # Mappings
//!
//! ```text
//! key: value          # scalar on the same line
//! key: [a, b, c]      # inline list of scalars
//! key:                # nested block, or the absent value when none follows
//!   inner: 1
//! ```
//!
//! The key ends at the first `:` outside quotes. A quote only opens a quoted
//! run at the start of a token, so `author's name: Bob` has the key
//! `author's name`. If a key repeats in one block, the last occurrence wins.
//!
//! # Sequences
//!
//! ```text
//! - scalar
//! - key: value        # a mapping whose first entry shares the dash line
//!   other: value
//! -                   # nested block, or the absent value when none follows
//!   - nested
//! ```
//!
//! A block holds either mapping entries or sequence entries. When both appear
//! in one block the mapping entries are kept and the sequence entries are
//! dropped.
//!
//! # Scalars
//!
//! Scalars are stored as raw tokens and only interpreted when materialized
//! into a target type.
//!
//! | Kind | Written as |
//! |------|------------|
//! | Boolean | `true`, `false` |
//! | Number | Rust's `Display` form, read back with `FromStr` |
//! | String | plain, or double-quoted when needed |
//! | Plain enum | variant name; the first variant is written empty |
//! | Flags | `Name1, Name2` in declaration order; none set is written empty |
//! | Absent / `None` | nothing after the `:` or `-` |
//!
//! Double-quoted tokens understand the escapes `\"`, `\\`, `\n`, `\r` and
//! `\t`. Single-quoted tokens are literal. A string is written double-quoted
//! when it contains any of `: " ' [ ] { } #`, a newline, a carriage return
//! or a tab, when it starts or ends with whitespace, or when it would read
//! back as a sequence entry.
//!
//! # Keys
//!
//! Struct fields are written under their canonical key: the first character
//! lower-cased and every `_x` turned into `X`, so `icon_path` is written as
//! `iconPath`. On input a field matches either its canonical key or its Rust
//! name. Keys of maps are written unchanged.
//!
//! # Canonical form
//!
//! The writer produces exactly one text for a given value:
//!
//! ```text
//! title: Hello World
//! content: "This is a test (including special characters! #)"
//! items:
//!   - true
//!   - false
//!   - true
//! ```
//!
//! Entries are separated by single newlines and there is no trailing
//! newline. Reading the canonical form and writing it again yields the same
//! text.
