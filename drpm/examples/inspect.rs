//! Print the parsed view of a deltarpm given on the command line.

use drpm::{DeltaInfo, DeltaRpm};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: inspect <file.drpm>")?;

    let delta = DeltaRpm::read_file(&path)?;
    let info = DeltaInfo::from_delta(&delta)?;

    println!(
        "{path}: {} delta, version {}, {} payload",
        info.delta_type, info.version, info.comp
    );
    println!("  source:  {}", info.src_nevr);
    println!(
        "  target:  {} ({} bytes, {} level {})",
        info.tgt_nevr, info.tgt_size, info.tgt_comp, info.tgt_comp_level
    );
    println!("  target MD5:  {}", info.tgt_md5);
    println!("  sequence:    {}", info.sequence);
    println!(
        "  copies:      {} internal, {} external ({} external bytes)",
        info.int_copies.len() / 2,
        info.ext_copies.len() / 2,
        info.ext_data_len
    );
    println!("  internal data: {} bytes", info.int_data_len);

    Ok(())
}
