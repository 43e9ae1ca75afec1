use std::io::{self, Write};

use crate::metrics::{Histogram, QUANTILES};

/// Write `h` as CSV: one row per recorded bucket, then one `# pNN` line per
/// tracked quantile. The engine is copied first, so `measure` calls on the
/// same histogram never wait on the writer.
///
/// ```text
/// from,to,count,percentile
/// 5,5,1,33.333
/// 10,10,1,66.667
/// 999936,1000447,1,100.000
/// # p50,10
/// # p99,1000447
/// ```
pub fn render<W: Write>(w: &mut W, h: &Histogram) -> io::Result<()> {
    let hist = h.with_engine(|e| e.clone());

    writeln!(w, "from,to,count,percentile")?;
    for v in hist.iter_recorded() {
        let to = v.value_iterated_to();
        writeln!(
            w,
            "{},{},{},{:.3}",
            hist.lowest_equivalent(to),
            to,
            v.count_at_value(),
            v.percentile(),
        )?;
    }
    for q in QUANTILES {
        let value = if hist.len() == 0 {
            0
        } else {
            hist.value_at_percentile(f64::from(q))
        };
        writeln!(w, "# p{q},{value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn rendered(h: &Histogram) -> String {
        let mut buf = Vec::new();
        render(&mut buf, h).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_histogram_has_header_and_quantiles() {
        let h = Histogram::new("empty").unwrap();
        assert_eq!(rendered(&h), "from,to,count,percentile\n# p50,0\n# p99,0\n");
    }

    #[test]
    fn test_rows_per_recorded_bucket() {
        let h = Histogram::new("rows").unwrap();
        for ns in [5, 5, 10, 10, 10, 20] {
            h.measure(Duration::from_nanos(ns));
        }
        let out = rendered(&h);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "from,to,count,percentile");
        assert_eq!(lines[1], "5,5,2,33.333");
        assert_eq!(lines[2], "10,10,3,83.333");
        assert_eq!(lines[3], "20,20,1,100.000");
        assert_eq!(lines[4], "# p50,10");
        assert_eq!(lines[5], "# p99,20");
        assert_eq!(lines.len(), 6);
    }

    /// Writer that parks on its first write until released.
    struct Gate {
        entered: mpsc::Sender<()>,
        release: mpsc::Receiver<()>,
        parked: bool,
    }

    impl Write for Gate {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.parked {
                self.parked = true;
                let _ = self.entered.send(());
                let _ = self.release.recv();
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_measure_not_blocked_by_slow_writer() {
        let h = Histogram::new("gated").unwrap();
        h.measure(Duration::from_nanos(5));

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let mut gate = Gate {
            entered: entered_tx,
            release: release_rx,
            parked: false,
        };
        let h = &h;

        std::thread::scope(|s| {
            let renderer = s.spawn(move || render(&mut gate, h));
            entered_rx.recv().unwrap();

            s.spawn(move || {
                h.measure(Duration::from_nanos(7));
                done_tx.send(()).unwrap();
            });
            let finished = done_rx.recv_timeout(Duration::from_secs(5)).is_ok();

            release_tx.send(()).unwrap();
            renderer.join().unwrap().unwrap();
            assert!(finished, "measure waited on the distribution writer");
        });
        assert_eq!(h.percentiles().count, 2);
    }
}
