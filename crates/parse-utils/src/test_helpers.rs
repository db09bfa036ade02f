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

//! Various functions used in testing the correctness or
//! serializing/deserializing wire protocols

use crate::{ReadablePdu, ReadablePduWithOneInput, WritablePdu, WritablePduWithOneInput};
use std::{fmt::Debug, io::Cursor};

/// Helper method to combine multiple vectors into one
pub fn combine(v: Vec<&[u8]>) -> Vec<u8> {
    v.iter()
        .flat_map(|x| x.iter())
        .cloned()
        .collect::<Vec<u8>>()
}

/// Fancier assert to for more meaningful error messages
pub fn test_parsed_completely<'a, T, E>(input: &'a [u8], expected: &T) -> T
where
    T: ReadablePdu<'a, E> + PartialEq + Debug,
    E: Debug,
{
    let parsed = <T as ReadablePdu<E>>::from_wire(input);
    assert!(
        parsed.is_ok(),
        "Message failed parsing, while expecting it to pass.\n\tExpected : {expected:?}\n\tParsed msg: {parsed:?}"
    );
    let (span, value) = parsed.unwrap();
    assert_eq!(&value, expected);
    assert_eq!(
        span.len(),
        0,
        "Not all the input is consumed by the parser, didn't consume: {span:?}",
    );
    value
}

/// Fancier assert to for more meaningful error messages
pub fn test_parsed_completely_with_one_input<'a, T, I, E>(
    input: &'a [u8],
    parser_input: I,
    expected: &T,
) -> T
where
    T: ReadablePduWithOneInput<'a, I, E> + PartialEq + Debug,
    E: Debug,
{
    let parsed = <T as ReadablePduWithOneInput<I, E>>::from_wire(input, parser_input);
    assert!(
        parsed.is_ok(),
        "Message failed parsing, while expecting it to pass.\n\tExpected : {expected:?}\n\tParsed msg: {parsed:?}"
    );
    let (span, value) = parsed.unwrap();
    assert_eq!(&value, expected);
    assert_eq!(
        span.len(),
        0,
        "Not all the input is consumed by the parser, didn't consume: {span:?}",
    );
    value
}

/// Fancier assert to for more meaningful error messages
pub fn test_parse_error<'a, T, E>(input: &'a [u8], expected_err: &E)
where
    T: ReadablePdu<'a, E> + Debug,
    E: Debug + Eq,
{
    let parsed = <T as ReadablePdu<E>>::from_wire(input);
    assert!(
        parsed.is_err(),
        "Message was parsed, while expecting it to fail.\n\tExpected : {expected_err:?}\n\tParsed msg: {parsed:?}"
    );

    if let Err(nom::Err::Error(parsed_error)) = parsed {
        assert_eq!(&parsed_error, expected_err);
    } else {
        panic!(
            "Expected the test to fail with Err(nom::Err:Err(x)) but it didn't. Got {parsed:?} instead"
        );
    }
}

/// Fancier assert to for more meaningful error messages
pub fn test_parse_error_with_one_input<'a, T, I, E>(
    input: &'a [u8],
    parser_input: I,
    expected_err: &E,
) where
    T: ReadablePduWithOneInput<'a, I, E> + Debug,
    E: Debug + Eq,
{
    let parsed = <T as ReadablePduWithOneInput<I, E>>::from_wire(input, parser_input);
    assert!(
        parsed.is_err(),
        "Message was parsed, while expecting it to fail.\n\tExpected : {expected_err:?}\n\tParsed msg: {parsed:?}"
    );

    if let Err(nom::Err::Error(parsed_error)) = parsed {
        assert_eq!(&parsed_error, expected_err);
    } else {
        panic!(
            "Expected the test to fail with Err(nom::Err:Err(x)) but it didn't. Got {parsed:?} instead"
        );
    }
}

pub fn test_write<T: WritablePdu<E>, E: Eq>(input: &T, expected: &[u8]) -> Result<(), E> {
    let mut buf: Vec<u8> = vec![];
    let mut cursor = Cursor::new(&mut buf);
    input.write(&mut cursor)?;
    assert_eq!(
        buf, expected,
        "Serialized buffer is different the the expected one"
    );
    assert_eq!(
        input.len(),
        expected.len(),
        "Packet::len() is different the serialized buffer length"
    );
    Ok(())
}

pub fn test_write_with_one_input<I: Copy, T: WritablePduWithOneInput<I, E>, E: Eq>(
    input: &T,
    writer_input: I,
    expected: &[u8],
) -> Result<(), E> {
    let mut buf: Vec<u8> = vec![];
    let mut cursor = Cursor::new(&mut buf);
    input.write(&mut cursor, writer_input)?;
    assert_eq!(
        buf, expected,
        "Serialized buffer is different the the expected one"
    );
    assert_eq!(
        input.len(writer_input),
        expected.len(),
        "Packet::len() is different the serialized buffer length"
    );
    Ok(())
}
