use crate::util::*;
use color_eyre::eyre::{bail, ensure, Context};
use fdchan::pipe;

/// A non-blocking read with nothing buffered is the WouldBlock signal, not
/// an error and not end of stream, and leaves the buffer alone.
pub fn read_signals_would_block() -> TestResult {
    let (sink, source) = pipe().context("pipe creation failed")?;
    source.set_blocking(false)?;

    let mut buf = [0xaa_u8; 8];
    match source.read(&mut buf) {
        Err(e) if e.is_would_block() => {}
        other => bail!("expected WouldBlock, got {other:?}"),
    }
    ensure_eq!(buf, [0xaa; 8], "a would-block read must not touch the buffer");

    // Once data shows up the same non-blocking read goes through.
    ensure_eq!(sink.write(&[7, 8])?, 2);
    ensure!(
        eventually(|| {
            match source.read(&mut buf) {
                Ok(n) => {
                    ensure_eq!(n, 2);
                    ensure_eq!(&buf[..2], &[7_u8, 8][..]);
                    Ok(true)
                }
                Err(e) if e.is_would_block() => Ok(false),
                Err(e) => Err(e.into()),
            }
        })?,
        "written data never became readable"
    );
    Ok(())
}

pub fn mode_is_reversible() -> TestResult {
    let (sink, source) = pipe().context("pipe creation failed")?;
    ensure!(source.is_blocking(), "ends start out blocking");

    source.set_blocking(false)?;
    ensure!(!source.is_blocking(), "flag must track the switch");
    source.set_blocking(true)?;
    ensure!(source.is_blocking(), "and the switch back");

    // Blocking semantics must be restored for real, not just in the flag.
    sink.write(&[42])?;
    let mut buf = [0_u8; 1];
    ensure_eq!(source.read(&mut buf)?, 1);
    ensure_eq!(buf[0], 42);
    Ok(())
}

pub fn available_reports_buffered_bytes() -> TestResult {
    let (sink, source) = pipe().context("pipe creation failed")?;
    ensure_eq!(source.available()?, 0);

    sink.write(&[1, 2, 3])?;
    ensure!(
        eventually(|| Ok(source.available()? == 3))?,
        "available() never reached the number of buffered bytes"
    );
    Ok(())
}
