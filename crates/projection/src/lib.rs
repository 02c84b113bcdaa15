//! Coordinate reference system transformations.
//!
//! Implements the map projections used by mesh-fill plots from scratch
//! without external dependencies. Projections are selected by the plotting
//! library's signed integer type codes:
//!
//! | Code | Type |
//! |------|------|
//! | `0`  | linear |
//! | `-3` | polar, hemisphere inferred from the data |
//! | `4`  | lambert conformal conic |
//! | `5`  | mercator |
//! | `6`  | polar stereographic |

pub mod error;
pub mod geographic;
pub mod lambert;
pub mod mercator;
pub mod polar;
pub mod transform;

pub use error::{ProjectionError, ProjectionResult};
pub use geographic::PlateCarree;
pub use lambert::LambertConformal;
pub use mercator::Mercator;
pub use polar::{Hemisphere, PolarStereographic};
pub use transform::{MapProjection, Projection, ProjectionType, Projector};
