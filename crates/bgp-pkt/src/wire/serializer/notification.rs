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

use crate::BgpNotificationMessage;
use bgpwire_parse_utils::WritablePdu;
use byteorder::WriteBytesExt;
use std::io::Write;

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum BgpNotificationMessageWritingError {
    StdIOError(String),
}

writing_error_conversions!(BgpNotificationMessageWritingError);

impl WritablePdu<BgpNotificationMessageWritingError> for BgpNotificationMessage {
    /// 1 octet for the error code and a second for the sub-code
    const BASE_LENGTH: usize = 2;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + self.value().len()
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), BgpNotificationMessageWritingError> {
        writer.write_u8(self.code())?;
        writer.write_u8(self.sub_code())?;
        writer.write_all(self.value())?;
        Ok(())
    }
}
