// Predictor collaborators: local linear weights or a remote model server.

pub mod linear;
pub mod remote;
pub mod traits;

pub use linear::{LinearPredictor, LinearWeights, WeightsError};
pub use remote::RemotePredictor;
pub use traits::{Predictor, check_columns};
