pub mod nifti;
pub mod nifti_writer;
