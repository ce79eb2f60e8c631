//! The Realm: a sparse, lazily generated hex map.
//!
//! Hexes are created the first time the company can see them. Terrain and
//! annotations are rolled once at that point and never rerolled. Exploring
//! and travelling are deterministic given the injected RNG.

pub mod domain;
