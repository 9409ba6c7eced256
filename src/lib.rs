//! An in-memory spatial index mapping axis-aligned bounding boxes in
//! `d`-dimensional space to caller-owned features.
//!
//! The index is a height-balanced [R-tree][RTree] supporting dynamic
//! insertion and removal as well as one-shot bulk construction. Queries are
//! closed box intersections: every indexed feature whose minimum bounding
//! rectangle ([`Mbr`]) touches the query box is returned.
//!
//! Boxes come in two coordinate kinds, signed 32-bit integer and 64-bit
//! float. Predicates across kinds are total and simply answer `false`, so a
//! mismatched query yields an empty result rather than an error.
//!
//! ```
//! use mbr_index::{Feature, Mbr, RTree};
//!
//! #[derive(PartialEq)]
//! struct City {
//!     x: f64,
//!     y: f64,
//!     name: &'static str,
//! }
//!
//! impl Feature for City {
//!     fn mbr(&self) -> Mbr {
//!         Mbr::from_f64(&[self.x, self.y], &[0.0, 0.0]).unwrap()
//!     }
//! }
//!
//! let mut tree = RTree::new(2, 8);
//! tree.insert(City { x: 13.4, y: 52.5, name: "Berlin" });
//! tree.insert(City { x: 2.35, y: 48.86, name: "Paris" });
//!
//! let query = Mbr::from_f64(&[0.0, 45.0], &[5.0, 10.0]).unwrap();
//! let hits = tree.search(&query);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].name, "Paris");
//! ```

pub mod error;
mod feature;
mod mbr;
pub mod rtree;
mod scalar;

pub use error::MbrIndexError;
pub use feature::Feature;
pub use mbr::{Mbr, MbrKind};
pub use rtree::RTree;
pub use scalar::MbrNum;

#[cfg(test)]
pub(crate) mod test;
