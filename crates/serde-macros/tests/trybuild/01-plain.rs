use nom::{error::ErrorKind, number::complete::be_u8, IResult};
use pathwire_parse_utils::{LocatedParsingError, Span};
use pathwire_serde_macros::LocatedError;

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum TestError {
    NomError(#[from_nom] ErrorKind),
}

fn parse(buf: Span<'_>) -> IResult<Span<'_>, u8, LocatedTestError<'_>> {
    be_u8(buf)
}

fn main() {
    let span = Span::new(&[]);
    let parsed = parse(span);
    let expected = LocatedTestError::new(span, TestError::NomError(ErrorKind::Eof));
    assert_eq!(parsed, Err(nom::Err::Error(expected.clone())));
    assert_eq!(expected.span().location_offset(), 0);
    assert_eq!(expected.error(), &TestError::NomError(ErrorKind::Eof));
}
