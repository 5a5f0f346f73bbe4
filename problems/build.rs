//! Generates the `Problem` enumeration from `resources/problem-codes.csv`.
//!
//! The codes are data rather than source so that the set of codes is easy
//! to review and so that documentation can be generated from the same file.
use std::{env, error::Error, fmt::Write as _, fs, path::PathBuf, process};

struct ProblemDef {
    /// The code that users know this as. This should remain stable
    /// between releases to facilitate consistent documentation.
    code: String,
    /// The internal name that this problem is known as. This makes for
    /// easy reading, but we don't promise that this remains consistent
    /// between releases.
    name: String,
    /// A message describing the type of problem.
    message: String,
}

fn create_problems() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=resources/problem-codes.csv");

    let mut src_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    src_path.push("resources");
    src_path.push("problem-codes.csv");

    let src = fs::read_to_string(src_path)?;

    let mut defs = vec![];
    let mut rdr = csv::Reader::from_reader(src.as_bytes());
    for result in rdr.records() {
        let record = result?;
        let field = |index: usize| {
            record
                .get(index)
                .map(str::to_string)
                .ok_or_else(|| format!("Record {:?} is not valid at column {}", record, index))
        };
        defs.push(ProblemDef {
            code: field(0)?,
            name: field(1)?,
            message: field(2)?,
        });
    }

    let mut out = String::new();

    writeln!(out, "pub enum Problem {{")?;
    for def in &defs {
        writeln!(out, "    {},", def.name)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl Problem {{")?;
    writeln!(
        out,
        "    /// Returns the stable code for the problem as a string."
    )?;
    writeln!(out, "    pub fn code(&self) -> &'static str {{")?;
    writeln!(out, "        match self {{")?;
    for def in &defs {
        writeln!(out, "            Problem::{} => \"{}\",", def.name, def.code)?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(
        out,
        "    /// Returns the constant message for the problem as a string."
    )?;
    writeln!(out, "    pub fn message(&self) -> &'static str {{")?;
    writeln!(out, "        match self {{")?;
    for def in &defs {
        writeln!(
            out,
            "            Problem::{} => \"{}\",",
            def.name, def.message
        )?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    let mut out_path = PathBuf::from(env::var("OUT_DIR")?);
    out_path.push("problems.rs");
    fs::write(out_path, out)?;

    Ok(())
}

fn main() {
    if let Err(err) = create_problems() {
        println!("problem generating problems.rs: {}", err);
        process::exit(1);
    }
}
