use pathwire_serde_macros::WritingError;
use std::io::Write;

#[derive(WritingError, Eq, PartialEq, Debug, Clone)]
pub enum InnerWritingError {
    StdIOError(#[from_std_io_error] String),
}

#[derive(WritingError, Eq, PartialEq, Debug, Clone)]
pub enum OuterWritingError {
    StdIOError(#[from_std_io_error] String),
    Inner(#[from] InnerWritingError),
}

fn write_inner(buf: &mut [u8]) -> Result<(), InnerWritingError> {
    let mut cursor = std::io::Cursor::new(buf);
    cursor.write_all(&[1, 2, 3])?;
    Ok(())
}

fn write_outer(buf: &mut [u8]) -> Result<(), OuterWritingError> {
    write_inner(buf)?;
    Ok(())
}

fn main() {
    let mut buf = [0u8; 1];
    assert!(matches!(
        write_outer(&mut buf),
        Err(OuterWritingError::Inner(InnerWritingError::StdIOError(_)))
    ));
    let mut buf = [0u8; 3];
    assert_eq!(write_outer(&mut buf), Ok(()));
}
