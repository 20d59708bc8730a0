//! Deterministic translation components, leaf-first: types and cipher
//! table, then the disambiguator, reconstructor, prime registry,
//! fingerprint hasher, entity classifier and consistency validator.

pub mod cipher;
pub mod disambiguator;
pub mod engine;
pub mod entity;
pub mod hasher;
pub mod reconstructor;
pub mod registry;
pub mod types;
pub mod validator;
