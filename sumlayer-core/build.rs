use std::env;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

#[path = "src/build_common.rs"]
pub mod build_common;
use crate::build_common::{fold_table_entry, move_row_right, Row, FOLD_TABLE_SIZE, ROW_TABLE_SIZE};

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("build_generated.rs");
    let mut f = File::create(&dest_path)?;

    f.write_all(b"static MOVE_RIGHT_ROW_TABLE: [u16; ROW_TABLE_SIZE] = [\n")?;
    for index in 0..ROW_TABLE_SIZE {
        let result = move_row_right(Row::from_index(index));
        writeln!(f, "    {},", result.0)?;
    }
    f.write_all(b"];\n\n")?;

    f.write_all(b"static FOLD_TABLE: [u16; FOLD_TABLE_SIZE] = [\n")?;
    for index in 0..FOLD_TABLE_SIZE {
        writeln!(f, "    {},", fold_table_entry(index))?;
    }
    f.write_all(b"];\n")?;

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/build_common.rs");

    Ok(())
}
