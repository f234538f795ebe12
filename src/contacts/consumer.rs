use crate::contacts::contact_graph::ContactGraph;
use crate::contacts::pair::Pair;
use crate::error::Result;
use std::io::Write;

/// Sink for the pairs of a finished contact graph, fed in sorted order.
pub trait PairConsumer {
    fn consume(&mut self, pair: Pair) -> Result<()>;

    /// Called once after the last pair.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl PairConsumer for Vec<Pair> {
    fn consume(&mut self, pair: Pair) -> Result<()> {
        self.push(pair);
        Ok(())
    }
}

/// Writes one `"i j"` line per pair.
pub struct EdgeListWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> EdgeListWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PairConsumer for EdgeListWriter<W> {
    fn consume(&mut self, pair: Pair) -> Result<()> {
        writeln!(self.out, "{} {}", pair.i(), pair.j())?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl ContactGraph {
    /// Feeds every pair, in order, to `consumer`, then finishes it.
    pub fn emit<C: PairConsumer + ?Sized>(&self, consumer: &mut C) -> Result<()> {
        for &pair in self.pairs() {
            consumer.consume(pair)?;
        }
        consumer.finish()
    }
}
