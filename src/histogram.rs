//! Patience/Histogram diff: recursive LCS splitting over hashed occurrence
//! chains, falling back to Myers when a region's hash chains get too dense
//! to search cheaply.
//!
//! The occurrence index packs `(next_record, first_occurrence_ptr, count)`
//! into a single `u64` per record, as prescribed by the Design Notes: the
//! pointer field is kept at 28 bits (sequences up to 2^28 - 1 elements) and
//! the count field saturates at 255 rather than growing to accommodate it.

use crate::algorithm::{DiffAlgorithm, Region};
use crate::cancel::CancellationToken;
use crate::comparator::Comparator;
use crate::edit::{Edit, EditList};
use crate::error::{Error, Result};
use crate::myers::diff_myers;
use crate::sequence::Sequence;

const COUNT_BITS: u32 = 8;
const PTR_BITS: u32 = 28;
const NEXT_BITS: u32 = 64 - COUNT_BITS - PTR_BITS;
const COUNT_MASK: u64 = (1 << COUNT_BITS) - 1;
const PTR_MASK: u64 = (1 << PTR_BITS) - 1;
const NEXT_MASK: u64 = (1 << NEXT_BITS) - 1;

/// The largest region (`end_a - begin_a`) the packed pointer field can
/// address. Regions larger than this raise [`Error::SequenceTooLarge`].
pub const MAX_REGION_LEN: u32 = PTR_MASK as u32;

#[inline]
fn rec_create(next: u32, ptr: u32, cnt: u32) -> u64 {
    debug_assert!(ptr as u64 <= PTR_MASK && ptr != 0);
    debug_assert!(next as u64 <= NEXT_MASK);
    ((next as u64) << (COUNT_BITS + PTR_BITS)) | ((ptr as u64) << COUNT_BITS) | (cnt.min(255) as u64)
}

#[inline]
fn rec_next(r: u64) -> u32 {
    ((r >> (COUNT_BITS + PTR_BITS)) & NEXT_MASK) as u32
}

#[inline]
fn rec_ptr(r: u64) -> u32 {
    ((r >> COUNT_BITS) & PTR_MASK) as u32
}

#[inline]
fn rec_cnt(r: u64) -> u32 {
    (r & COUNT_MASK) as u32
}

/// Fibonacci-mix a 32-bit hash down to `table_bits` bits.
#[inline]
fn fib_mix(hash: u32, table_bits: u32) -> u32 {
    hash.wrapping_mul(0x9E3779B1) >> (32 - table_bits)
}

/// The Histogram diff backend, configured with the chain-length cap past
/// which a region is abandoned in favor of the fallback algorithm (Myers).
#[derive(Debug, Clone, Copy)]
pub struct Histogram {
    /// Any element whose occurrence chain reaches this length during index
    /// construction aborts the whole region. Default 64.
    pub max_chain_length: u32,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            max_chain_length: 64,
        }
    }
}

impl<S: Sequence, C: Comparator<S>> DiffAlgorithm<S, C> for Histogram {
    fn diff_non_common(
        &self,
        cmp: &C,
        a: &S,
        b: &S,
        region: Region,
        out: &mut EditList,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.run(cmp, a, b, region, out, cancel)
    }
}

/// Index over a region of `A`: a hash table of record chains plus, per
/// position, the record it belongs to and the next later occurrence of the
/// same element.
struct Index {
    begin_a: u32,
    table: Vec<u32>,
    table_bits: u32,
    recs: Vec<u64>,
    next: Vec<u32>,
    rec_idx: Vec<u32>,
}

impl Index {
    fn abs(&self, rel_ptr: u32) -> u32 {
        self.begin_a + rel_ptr - 1
    }
}

/// Outcome of building the index and running the LCS search over one region.
enum Scan {
    /// No element of the region is shared between `A` and `B`.
    NoCommon,
    /// Every shared element lived in a chain longer than the configured cap.
    Aborted,
    /// The longest, lowest-occurrence common run found.
    Found { begin_a: u32, begin_b: u32, len: u32 },
}

impl Histogram {
    fn run<S: Sequence, C: Comparator<S>>(
        &self,
        cmp: &C,
        a: &S,
        b: &S,
        region: Region,
        out: &mut EditList,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let mut stack = vec![region];
        while let Some(region) = stack.pop() {
            cancel.check()?;
            if region.is_empty() {
                continue;
            }
            if region.len_a() == 0 {
                out.push(Edit::new(
                    region.begin_a,
                    region.begin_a,
                    region.begin_b,
                    region.end_b,
                ));
                continue;
            }
            if region.len_b() == 0 {
                out.push(Edit::new(
                    region.begin_a,
                    region.end_a,
                    region.begin_b,
                    region.begin_b,
                ));
                continue;
            }
            if region.len_a() == 1 && region.len_b() == 1 {
                out.push(Edit::new(
                    region.begin_a,
                    region.end_a,
                    region.begin_b,
                    region.end_b,
                ));
                continue;
            }
            if region.len_a() > MAX_REGION_LEN {
                return Err(Error::SequenceTooLarge);
            }

            match self.scan(cmp, a, b, region)? {
                Scan::NoCommon => {
                    out.push(Edit::new(
                        region.begin_a,
                        region.end_a,
                        region.begin_b,
                        region.end_b,
                    ));
                }
                Scan::Aborted => {
                    diff_myers(cmp, a, b, region, out, cancel)?;
                }
                Scan::Found {
                    begin_a,
                    begin_b,
                    len,
                } => {
                    let before = Region::new(region.begin_a, begin_a, region.begin_b, begin_b);
                    let after = Region::new(
                        begin_a + len,
                        region.end_a,
                        begin_b + len,
                        region.end_b,
                    );
                    if !after.is_empty() {
                        stack.push(after);
                    }
                    if !before.is_empty() {
                        stack.push(before);
                    }
                }
            }
        }
        out.sort_by_key(|e| e.begin_a);
        Ok(())
    }

    fn build_index<S: Sequence, C: Comparator<S>>(
        &self,
        cmp: &C,
        a: &S,
        region: Region,
    ) -> Option<Index> {
        let len_a = region.len_a();
        let table_bits = (len_a.max(1)).next_power_of_two().trailing_zeros().max(1);
        let table_size = 1usize << table_bits;

        let mut table = vec![0u32; table_size];
        let mut recs: Vec<u64> = Vec::with_capacity((len_a as usize + 2).min(len_a as usize + 1));
        recs.push(0); // index 0 is the sentinel.
        let mut true_count: Vec<u32> = vec![0];
        let mut next = vec![0u32; len_a as usize];
        let mut rec_idx = vec![0u32; len_a as usize];

        for p in (region.begin_a..region.end_a).rev() {
            let rel = p - region.begin_a;
            let h = cmp.hash(a, p);
            let slot = fib_mix(h, table_bits) as usize;

            let mut chain = table[slot];
            let mut matched = 0u32;
            while chain != 0 {
                let r = recs[chain as usize];
                let head_abs = region.begin_a + rec_ptr(r) - 1;
                if cmp.eq(a, p, a, head_abs) {
                    matched = chain;
                    break;
                }
                chain = rec_next(r);
            }

            if matched != 0 {
                let r = recs[matched as usize];
                let cnt = true_count[matched as usize] + 1;
                if cnt >= self.max_chain_length {
                    return None;
                }
                true_count[matched as usize] = cnt;
                next[rel as usize] = rec_ptr(r);
                recs[matched as usize] = rec_create(rec_next(r), rel + 1, cnt);
                rec_idx[rel as usize] = matched;
            } else {
                let new_idx = recs.len() as u32;
                recs.push(rec_create(table[slot], rel + 1, 1));
                true_count.push(1);
                rec_idx[rel as usize] = new_idx;
                table[slot] = new_idx;
            }
        }

        Some(Index {
            begin_a: region.begin_a,
            table,
            table_bits,
            recs,
            next,
            rec_idx,
        })
    }

    fn scan<S: Sequence, C: Comparator<S>>(
        &self,
        cmp: &C,
        a: &S,
        b: &S,
        region: Region,
    ) -> Result<Scan> {
        let index = match self.build_index(cmp, a, region) {
            Some(idx) => idx,
            None => return Ok(Scan::Aborted),
        };

        let mut has_common = false;
        let mut best_cnt = self.max_chain_length + 1;
        let mut best: Option<(u32, u32, u32)> = None; // (begin_a, begin_b, len)

        let mut bp = region.begin_b;
        while bp < region.end_b {
            let h = cmp.hash(b, bp);
            let slot = fib_mix(h, index.table_bits) as usize;
            let mut chain = index.table[slot];
            let mut next_bp = bp + 1;

            while chain != 0 {
                let r = index.recs[chain as usize];
                let first_abs = index.abs(rec_ptr(r));
                if !cmp.eq(a, first_abs, b, bp) {
                    chain = rec_next(r);
                    continue;
                }
                has_common = true;
                let cnt = rec_cnt(r);
                if cnt > best_cnt {
                    chain = rec_next(r);
                    continue;
                }

                let mut occ = rec_ptr(r);
                loop {
                    let occ_abs = index.abs(occ);
                    let mut min_cnt = cnt;

                    let mut s1 = occ_abs;
                    let mut s2 = bp;
                    while s1 > region.begin_a && s2 > region.begin_b && cmp.eq(a, s1 - 1, b, s2 - 1)
                    {
                        s1 -= 1;
                        s2 -= 1;
                        let rc = index.rec_idx[(s1 - index.begin_a) as usize];
                        if rc != 0 {
                            min_cnt = min_cnt.min(rec_cnt(index.recs[rc as usize]));
                        }
                    }

                    let mut e1 = occ_abs + 1;
                    let mut e2 = bp + 1;
                    while e1 < region.end_a && e2 < region.end_b && cmp.eq(a, e1, b, e2) {
                        let rc = index.rec_idx[(e1 - index.begin_a) as usize];
                        if rc != 0 {
                            min_cnt = min_cnt.min(rec_cnt(index.recs[rc as usize]));
                        }
                        e1 += 1;
                        e2 += 1;
                    }

                    let len = e2 - s2;
                    if next_bp < e2 {
                        next_bp = e2;
                    }
                    let better = match best {
                        None => true,
                        Some((_, _, best_len)) => len > best_len || min_cnt < best_cnt,
                    };
                    if better {
                        best = Some((s1, s2, len));
                        best_cnt = min_cnt;
                    }

                    let mut advanced = None;
                    let rel = occ - 1; // occ is 1-based
                    let mut n = index.next[rel as usize];
                    while n != 0 {
                        if index.abs(n) >= e1 {
                            advanced = Some(n);
                            break;
                        }
                        n = index.next[(n - 1) as usize];
                    }
                    match advanced {
                        Some(n) => occ = n,
                        None => break,
                    }
                }

                chain = rec_next(r);
            }

            bp = next_bp;
        }

        if !has_common {
            return Ok(Scan::NoCommon);
        }
        match best {
            Some((begin_a, begin_b, len)) if best_cnt <= self.max_chain_length => {
                Ok(Scan::Found {
                    begin_a,
                    begin_b,
                    len,
                })
            }
            _ => Ok(Scan::Aborted),
        }
    }
}
