pub mod edit_distance;
pub mod segmentation;
pub mod similarity;
pub mod timestamps;
pub mod tokenization;
