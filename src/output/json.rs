//
//  crm-client
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! JSON output for `--json` mode.
//!
//! Records serialize transparently, so the output carries every field the
//! API returned, in wire order.

use std::io::{self, Write};

use serde::Serialize;

/// Writes `value` to stdout as pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json_to(&mut handle, value)
}

/// Writes `value` as pretty-printed JSON to any writer.
pub fn write_json_to<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_json_keeps_field_order() {
        let mut buf = Vec::new();
        write_json_to(&mut buf, &json!({"id": "lead_1", "name": "Acme", "custom.a": 1})).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let id = text.find("\"id\"").unwrap();
        let name = text.find("\"name\"").unwrap();
        let custom = text.find("\"custom.a\"").unwrap();
        assert!(id < name && name < custom);
        assert!(text.ends_with("}\n"));
    }
}
