mod prophet;

pub use prophet::ProphetModel;
