// Copyright (C) 2022-present The NetGauze Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Traits for Ser/Deser wire protocols

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use nom::{
    error::{ErrorKind, FromExternalError, ParseError},
    IResult,
};
use std::fmt::Debug;

pub type Span<'a> = &'a [u8];

/// Generic trait for Readable Protocol Data Unit that doesn't need any external
/// input while parsing the packet.
pub trait ReadablePdu<'a, Error: Debug> {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, Error>
    where
        Self: Sized;
}

/// Generic trait Readable Protocol Data Unit that does need a single external
/// input
pub trait ReadablePduWithOneInput<'a, T, ErrorType> {
    fn from_wire(buf: Span<'a>, input: T) -> IResult<Span<'a>, Self, ErrorType>
    where
        Self: Sized;
}

/// Generic trait for Readable Protocol Data Unit that does need two external
/// inputs
pub trait ReadablePduWithTwoInputs<'a, T, U, ErrorType> {
    fn from_wire(buf: Span<'a>, input1: T, input2: U) -> IResult<Span<'a>, Self, ErrorType>
    where
        Self: Sized;
}

/// Generic trait for Writable Protocol Data Unit that doesn't need any external
/// input while writing the packet.
#[allow(clippy::len_without_is_empty)]
pub trait WritablePdu<ErrorType> {
    const BASE_LENGTH: usize;

    /// The total length of the written buffer
    ///
    /// *Note*: the [`Self::len`] might be less than the length value written in
    /// the PDU, since most PDUs don't include the length of their 'length'
    /// field in the calculation
    fn len(&self) -> usize;

    fn write<T: std::io::Write>(&self, _writer: &mut T) -> Result<(), ErrorType>
    where
        Self: Sized;
}

/// Generic trait for Writable Protocol Data Unit that needs a single external
/// input while writing the packet, e.g. the negotiated AS number width.
#[allow(clippy::len_without_is_empty)]
pub trait WritablePduWithOneInput<I, ErrorType> {
    const BASE_LENGTH: usize;

    /// The total length of the written buffer
    ///
    /// *Note*: the [`Self::len`] might be less than the length value written in
    /// the PDU, since most PDUs don't include the length of their 'length'
    /// field in the calculation
    fn len(&self, input: I) -> usize;

    fn write<T: std::io::Write>(&self, _writer: &mut T, input: I) -> Result<(), ErrorType>
    where
        Self: Sized;
}

/// Located Parsing error is the error raised by parsing a given buffer and a
/// reference to the location where it occurred. The [`Span`] should refer (as
/// much as possible) to the first byte where the error started
pub trait LocatedParsingError {
    type Span;
    type Error;

    fn span(&self) -> &Self::Span;
    fn error(&self) -> &Self::Error;
}

/// Couples a parsing error with the input where it was raised.
///
/// Any error type that can be built from a nom [`ErrorKind`] can be located,
/// which makes `Located<'a, E>` usable as the error type of nom parsers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Located<'a, E> {
    span: Span<'a>,
    error: E,
}

impl<'a, E> Located<'a, E> {
    pub const fn new(span: Span<'a>, error: E) -> Self {
        Self { span, error }
    }

    pub fn into_error(self) -> E {
        self.error
    }

    /// Convert the inner error while keeping the location
    pub fn map_into<F: From<E>>(self) -> Located<'a, F> {
        Located {
            span: self.span,
            error: self.error.into(),
        }
    }
}

impl<'a, E> LocatedParsingError for Located<'a, E> {
    type Span = Span<'a>;
    type Error = E;

    fn span(&self) -> &Self::Span {
        &self.span
    }

    fn error(&self) -> &Self::Error {
        &self.error
    }
}

impl<'a, E: From<ErrorKind>> ParseError<Span<'a>> for Located<'a, E> {
    fn from_error_kind(input: Span<'a>, kind: ErrorKind) -> Self {
        Located::new(input, kind.into())
    }

    fn append(_input: Span<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a, X, E: From<X>> FromExternalError<Span<'a>, X> for Located<'a, E> {
    fn from_external_error(input: Span<'a>, _kind: ErrorKind, e: X) -> Self {
        Located::new(input, e.into())
    }
}

#[inline]
fn map_located_err<'a, Lin, L: From<Lin>>(
    err: nom::Err<Located<'a, Lin>>,
) -> nom::Err<Located<'a, L>> {
    match err {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(error) => nom::Err::Error(error.map_into()),
        nom::Err::Failure(failure) => nom::Err::Failure(failure.map_into()),
    }
}

#[inline]
pub fn parse_into_located<'a, Lin: Debug, L: From<Lin>, T: ReadablePdu<'a, Located<'a, Lin>>>(
    buf: Span<'a>,
) -> IResult<Span<'a>, T, Located<'a, L>> {
    T::from_wire(buf).map_err(map_located_err)
}

#[inline]
pub fn parse_into_located_one_input<
    'a,
    I,
    Lin,
    L: From<Lin>,
    T: ReadablePduWithOneInput<'a, I, Located<'a, Lin>>,
>(
    buf: Span<'a>,
    input: I,
) -> IResult<Span<'a>, T, Located<'a, L>> {
    T::from_wire(buf, input).map_err(map_located_err)
}

/// Keep repeating the parser till the buf is empty
#[inline]
pub fn parse_till_empty<'a, T: ReadablePdu<'a, E>, E: Debug>(
    buf: Span<'a>,
) -> IResult<Span<'a>, Vec<T>, E> {
    let mut buf = buf;
    let mut ret = Vec::new();
    while !buf.is_empty() {
        let (tmp, element) = T::from_wire(buf)?;
        ret.push(element);
        buf = tmp;
    }
    Ok((buf, ret))
}

/// Keep repeating the parser till the buf is empty
#[inline]
pub fn parse_till_empty_into_located<
    'a,
    Lin: Debug,
    L: From<Lin>,
    T: ReadablePdu<'a, Located<'a, Lin>>,
>(
    buf: Span<'a>,
) -> IResult<Span<'a>, Vec<T>, Located<'a, L>> {
    let mut buf = buf;
    let mut ret = Vec::new();
    while !buf.is_empty() {
        let (tmp, element) = parse_into_located(buf)?;
        ret.push(element);
        buf = tmp;
    }
    Ok((buf, ret))
}

/// Keep repeating a plain parser function till the buf is empty, for
/// elements whose type can't carry a [`ReadablePdu`] impl in the calling crate
#[inline]
pub fn parse_till_empty_into_located_with<'a, T, Lin, L: From<Lin>, F>(
    buf: Span<'a>,
    parser: F,
) -> IResult<Span<'a>, Vec<T>, Located<'a, L>>
where
    F: Fn(Span<'a>) -> IResult<Span<'a>, T, Located<'a, Lin>>,
{
    let mut buf = buf;
    let mut ret = Vec::new();
    while !buf.is_empty() {
        let (tmp, element) = parser(buf).map_err(map_located_err)?;
        ret.push(element);
        buf = tmp;
    }
    Ok((buf, ret))
}

/// Keep repeating the parser till the buf is empty
#[inline]
pub fn parse_till_empty_into_with_one_input_located<
    'a,
    I: Clone,
    Lin,
    L: From<Lin>,
    T: ReadablePduWithOneInput<'a, I, Located<'a, Lin>>,
>(
    buf: Span<'a>,
    input: I,
) -> IResult<Span<'a>, Vec<T>, Located<'a, L>> {
    let mut buf = buf;
    let mut ret = Vec::new();
    while !buf.is_empty() {
        let (tmp, element) = parse_into_located_one_input(buf, input.clone())?;
        ret.push(element);
        buf = tmp;
    }
    Ok((buf, ret))
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(remote = "nom::error::ErrorKind")]
pub enum ErrorKindSerdeDeref {
    Tag,
    MapRes,
    MapOpt,
    Alt,
    IsNot,
    IsA,
    SeparatedList,
    SeparatedNonEmptyList,
    Many0,
    Many1,
    ManyTill,
    Count,
    TakeUntil,
    LengthValue,
    TagClosure,
    Alpha,
    Digit,
    HexDigit,
    OctDigit,
    AlphaNumeric,
    Space,
    MultiSpace,
    LengthValueFn,
    Eof,
    Switch,
    TagBits,
    OneOf,
    NoneOf,
    Char,
    CrLf,
    RegexpMatch,
    RegexpMatches,
    RegexpFind,
    RegexpCapture,
    RegexpCaptures,
    TakeWhile1,
    Complete,
    Fix,
    Escaped,
    EscapedTransform,
    NonEmpty,
    ManyMN,
    Not,
    Permutation,
    Verify,
    TakeTill1,
    TakeWhileMN,
    TooLarge,
    Many0Count,
    Many1Count,
    Float,
    Satisfy,
    Fail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::number::complete::be_u16;

    #[derive(Debug, PartialEq)]
    enum InnerError {
        NomError(ErrorKind),
    }

    impl From<ErrorKind> for InnerError {
        fn from(kind: ErrorKind) -> Self {
            Self::NomError(kind)
        }
    }

    #[derive(Debug, PartialEq)]
    enum OuterError {
        NomError(ErrorKind),
        Inner(InnerError),
    }

    impl From<ErrorKind> for OuterError {
        fn from(kind: ErrorKind) -> Self {
            Self::NomError(kind)
        }
    }

    impl From<InnerError> for OuterError {
        fn from(value: InnerError) -> Self {
            Self::Inner(value)
        }
    }

    #[derive(Debug, PartialEq)]
    struct Pair(u16);

    impl<'a> ReadablePdu<'a, Located<'a, InnerError>> for Pair {
        fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, Located<'a, InnerError>> {
            let (buf, value) = be_u16(buf)?;
            Ok((buf, Pair(value)))
        }
    }

    #[test]
    fn test_parse_till_empty_located() {
        let good = [0x00, 0x01, 0x00, 0x02];
        let bad = [0x00, 0x01, 0x00];
        let ret: IResult<Span<'_>, Vec<Pair>, Located<'_, OuterError>> =
            parse_till_empty_into_located(&good);
        assert_eq!(ret, Ok((&[][..], vec![Pair(1), Pair(2)])));

        let ret: IResult<Span<'_>, Vec<Pair>, Located<'_, OuterError>> =
            parse_till_empty_into_located(&bad);
        assert_eq!(
            ret,
            Err(nom::Err::Error(Located::new(
                &bad[2..],
                OuterError::Inner(InnerError::NomError(ErrorKind::Eof))
            )))
        );
    }

    fn parse_u16(buf: Span<'_>) -> IResult<Span<'_>, u16, Located<'_, InnerError>> {
        be_u16(buf)
    }

    #[test]
    fn test_parse_till_empty_located_with() {
        let good = [0x00, 0x01, 0x00, 0x02];
        let bad = [0x00, 0x01, 0x00];
        let ret: IResult<Span<'_>, Vec<u16>, Located<'_, OuterError>> =
            parse_till_empty_into_located_with(&good, parse_u16);
        assert_eq!(ret, Ok((&[][..], vec![1, 2])));

        let ret: IResult<Span<'_>, Vec<u16>, Located<'_, OuterError>> =
            parse_till_empty_into_located_with(&bad, parse_u16);
        assert_eq!(
            ret,
            Err(nom::Err::Error(Located::new(
                &bad[2..],
                OuterError::Inner(InnerError::NomError(ErrorKind::Eof))
            )))
        );
    }
}
