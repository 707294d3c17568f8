mod overwrite_buffer;

pub use overwrite_buffer::OverwriteBuffer;
