//! Test-case scene model: image geometry, light sources and ground truth

pub mod common_fields;
pub mod galaxy;
pub mod header;
pub mod image_parameters;
pub mod light_source;
pub mod position;
pub mod star;
pub mod test_case;

pub use common_fields::CommonFields;
pub use galaxy::Galaxy;
pub use header::HeaderRecord;
pub use image_parameters::ImageParameters;
pub use light_source::{LightSource, RenderableSource};
pub use position::Position;
pub use star::Star;
pub use test_case::GalSimTestCase;
