//! ### Cluster codec
//!
//! A cluster span is a run of contiguous sectors packed into 3 bytes as two 12 bit fields.
//! If the first sector is `BCD` and the count is `EFG` (hex digits) the bytes are `CD GB EF`.

use log::debug;
use serde::Serialize;
use super::types::*;

/// contiguous run of sectors
#[derive(Clone,Copy,PartialEq,Debug,Serialize)]
pub struct Span {
    pub first: u16,
    pub count: u16
}

impl Span {
    /// sector just past the end of the span
    pub fn end(&self) -> usize {
        self.first as usize + self.count as usize
    }
}

pub fn encode(first: u16,count: u16) -> [u8;3] {
    [
        (first & 0xff) as u8,
        ((first >> 8) & 0x0f) as u8 | ((count << 4) & 0xf0) as u8,
        ((count >> 4) & 0xff) as u8
    ]
}

pub fn decode(raw: &[u8;3]) -> Span {
    Span {
        first: ((raw[1] as u16 & 0x0f) << 8) | raw[0] as u16,
        count: ((raw[2] as u16) << 4) | (raw[1] as u16 >> 4)
    }
}

/// Walk a cluster table, stopping at the first span with zero count.
pub fn unpack_table(table: &[[u8;3];MAX_SPANS]) -> Vec<Span> {
    table.iter().map(decode).take_while(|s| s.count > 0).collect()
}

pub fn pack_table(spans: &[Span]) -> Result<[[u8;3];MAX_SPANS],Error> {
    if spans.len() > MAX_SPANS {
        return Err(Error::TooFragmented);
    }
    let mut ans = [[0;3];MAX_SPANS];
    for (i,span) in spans.iter().enumerate() {
        ans[i] = encode(span.first,span.count);
    }
    Ok(ans)
}

/// Groups sectors into spans in the order they are allocated.  A sector extends the
/// open span only if it is the next one after the span's end, otherwise a new span opens.
pub struct SpanBuilder {
    closed: Vec<Span>,
    open: Option<Span>
}

impl SpanBuilder {
    pub fn new() -> Self {
        Self {
            closed: Vec::new(),
            open: None
        }
    }
    pub fn push(&mut self,sec: usize) -> Result<(),Error> {
        if sec > MAX_SPAN_FIELD {
            return Err(Error::Range);
        }
        if let Some(span) = self.open.as_mut() {
            if span.end()==sec && (span.count as usize) < MAX_SPAN_FIELD {
                span.count += 1;
                return Ok(());
            }
        }
        if let Some(span) = self.open.take() {
            self.closed.push(span);
            if self.closed.len() >= MAX_SPANS {
                debug!("sector {} would open span {}",sec,MAX_SPANS+1);
                return Err(Error::TooFragmented);
            }
        }
        self.open = Some(Span { first: sec as u16, count: 1 });
        Ok(())
    }
    pub fn finish(mut self) -> Vec<Span> {
        if let Some(span) = self.open.take() {
            self.closed.push(span);
        }
        self.closed
    }
}

/// Build spans from a sequence of sectors in allocation order.
pub fn build_spans(sectors: &[usize]) -> Result<Vec<Span>,Error> {
    let mut builder = SpanBuilder::new();
    for sec in sectors {
        builder.push(*sec)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout() {
        assert_eq!(encode(0xbcd,0xef7),[0xcd,0x7b,0xef]);
        assert_eq!(decode(&[0xcd,0x7b,0xef]),Span { first: 0xbcd, count: 0xef7 });
    }

    #[test]
    fn round_trip_all_fields() {
        // every first sector, counts strided but always including the maximum
        let counts: Vec<u16> = (0..=MAX_SPAN_FIELD as u16).step_by(7).chain([MAX_SPAN_FIELD as u16]).collect();
        for first in 0..=MAX_SPAN_FIELD as u16 {
            for count in &counts {
                assert_eq!(decode(&encode(first,*count)),Span { first, count: *count });
            }
        }
    }

    #[test]
    fn contiguous_run() {
        let spans = build_spans(&[2,3,4,5]).expect("build");
        assert_eq!(spans,vec![Span { first: 2, count: 4 }]);
    }

    #[test]
    fn allocation_order_matters() {
        // 5 follows 4 in sector number but not in allocation order
        let spans = build_spans(&[10,11,5,6,12]).expect("build");
        assert_eq!(spans,vec![
            Span { first: 10, count: 2 },
            Span { first: 5, count: 2 },
            Span { first: 12, count: 1 }
        ]);
    }

    #[test]
    fn fragmentation_limit() {
        let odd: Vec<usize> = (0..MAX_SPANS).map(|i| 3 + 2*i).collect();
        assert_eq!(build_spans(&odd).expect("build").len(),MAX_SPANS);
        let odd: Vec<usize> = (0..MAX_SPANS+1).map(|i| 3 + 2*i).collect();
        assert!(matches!(build_spans(&odd),Err(Error::TooFragmented)));
    }

    #[test]
    fn table_stops_at_zero_count() {
        let table = pack_table(&[Span { first: 2, count: 3 },Span { first: 9, count: 1 }]).expect("pack");
        assert_eq!(unpack_table(&table).len(),2);
        assert_eq!(unpack_table(&[[0;3];MAX_SPANS]),vec![]);
    }
}
