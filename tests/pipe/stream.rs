use crate::util::*;
use color_eyre::eyre::Context;
use fdchan::pipe;
use std::{io::Write, thread};

const PAYLOAD_LEN: usize = 128 * 1024;

/// Bytes written to the sink in arbitrary chunking come out of the source in
/// the exact same order, in whatever chunking the reader happens to use.
pub fn fidelity() -> TestResult {
    let payload = Xorshift32(0xdeadbeef).bytes(PAYLOAD_LEN);
    let (mut sink, source) = pipe().context("pipe creation failed")?;

    let expected = payload.clone();
    let writer = thread::spawn(move || -> TestResult {
        let mut chunker = Xorshift32(0x1ee7);
        let mut rest = payload.as_slice();
        while !rest.is_empty() {
            let n = (chunker.next() as usize % 4096 + 1).min(rest.len());
            let (chunk, tail) = rest.split_at(n);
            sink.write_all(chunk).context("sink write failed")?;
            rest = tail;
        }
        Ok(()) // sink drops here, ending the stream
    });

    let mut received = Vec::with_capacity(PAYLOAD_LEN);
    let mut chunker = Xorshift32(0xc0ffee);
    let mut buf = [0_u8; 4096];
    loop {
        let want = chunker.next() as usize % buf.len() + 1;
        let n = source.read(&mut buf[..want]).context("source read failed")?;
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buf[..n]);
    }

    writer.join().unwrap()?;
    ensure_eq!(received.len(), expected.len());
    ensure_eq!(received, expected, "stream must preserve content and order");
    Ok(())
}

/// Write [1, 2, 3], drain through a 2-byte buffer, then observe end of
/// stream once the sink is gone.
pub fn chunked_read_scenario() -> TestResult {
    let (sink, source) = pipe().context("pipe creation failed")?;

    ensure_eq!(sink.write(&[])?, 0, "empty write returns 0");
    ensure_eq!(sink.write(&[1, 2, 3])?, 3);
    sink.flush()?;

    let mut buf = [0_u8; 2];
    ensure_eq!(source.read(&mut buf)?, 2);
    ensure_eq!(buf, [1, 2]);
    ensure_eq!(source.read(&mut buf)?, 1);
    ensure_eq!(buf[0], 3);

    sink.close()?;
    ensure_eq!(source.read(&mut buf)?, 0, "closed sink means end of stream");
    ensure_eq!(source.read(&mut buf)?, 0, "end of stream is permanent");
    Ok(())
}
