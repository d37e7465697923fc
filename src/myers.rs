//! "An O(ND) Difference Algorithm and its Variations" (Myers, 1986),
//! bidirectional bisection with linear-space middle-point recovery.

use crate::algorithm::{DiffAlgorithm, Region};
use crate::cancel::CancellationToken;
use crate::comparator::Comparator;
use crate::edit::{Edit, EditList};
use crate::error::Result;
use crate::sequence::Sequence;

/// The Myers diff backend. Holds no state between calls; every invocation
/// allocates its own scratch arrays sized to the region it is handed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Myers;

impl<S: Sequence, C: Comparator<S>> DiffAlgorithm<S, C> for Myers {
    fn diff_non_common(
        &self,
        cmp: &C,
        a: &S,
        b: &S,
        region: Region,
        out: &mut EditList,
        cancel: &CancellationToken,
    ) -> Result<()> {
        diff_region(cmp, a, b, region, out, cancel)
    }
}

fn diff_region<S: Sequence, C: Comparator<S>>(
    cmp: &C,
    a: &S,
    b: &S,
    region: Region,
    out: &mut EditList,
    cancel: &CancellationToken,
) -> Result<()> {
    cancel.check()?;

    let mut edit = Edit::new(region.begin_a, region.end_a, region.begin_b, region.end_b);
    cmp.reduce_common_start_end(a, b, &mut edit);
    let region = Region::new(edit.begin_a, edit.end_a, edit.begin_b, edit.end_b);

    let n = region.len_a();
    let m = region.len_b();

    if n == 0 && m == 0 {
        return Ok(());
    }
    if n == 0 {
        out.push(Edit::new(
            region.begin_a,
            region.begin_a,
            region.begin_b,
            region.end_b,
        ));
        return Ok(());
    }
    if m == 0 {
        out.push(Edit::new(
            region.begin_a,
            region.end_a,
            region.begin_b,
            region.begin_b,
        ));
        return Ok(());
    }
    if n == 1 && m == 1 {
        // The two elements differ, or reduce_common_start_end would have
        // consumed them already.
        out.push(Edit::new(
            region.begin_a,
            region.end_a,
            region.begin_b,
            region.end_b,
        ));
        return Ok(());
    }

    let (x, y) = find_middle_point(cmp, a, b, n, m, region.begin_a, region.begin_b, cancel)?;
    let mid = Edit::new(
        region.begin_a + x,
        region.begin_a + x,
        region.begin_b + y,
        region.begin_b + y,
    );

    if region.begin_a < mid.begin_a || region.begin_b < mid.begin_b {
        diff_region(
            cmp,
            a,
            b,
            Region::new(region.begin_a, mid.begin_a, region.begin_b, mid.begin_b),
            out,
            cancel,
        )?;
    }
    if !mid.is_empty() {
        out.push(mid);
    }
    if region.end_a > mid.end_a || region.end_b > mid.end_b {
        diff_region(
            cmp,
            a,
            b,
            Region::new(mid.end_a, region.end_a, mid.end_b, region.end_b),
            out,
            cancel,
        )?;
    }
    Ok(())
}

/// Finds a point `(x, y)` in `[0, n] x [0, m]` (local to the region starting
/// at `base_a`/`base_b`) through which both the forward and backward
/// reachable sets pass — the middle snake's endpoint.
///
/// Runs two interleaved bisections: a forward search over `(A, B)` directly,
/// and a backward search implemented as a forward search over the reversed
/// region, translating coordinates back at comparison time. Diagonal `k` in
/// the forward family and diagonal `k' = delta - k` in the backward family
/// refer to the same absolute diagonal; a crossing is detected as soon as
/// the two frontiers' translated reach overlap on it.
///
/// Every D-step polls `cancel`, satisfying the cooperative-cancellation
/// requirement for the Myers inner loop.
fn find_middle_point<S: Sequence, C: Comparator<S>>(
    cmp: &C,
    a: &S,
    b: &S,
    n: u32,
    m: u32,
    base_a: u32,
    base_b: u32,
    cancel: &CancellationToken,
) -> Result<(u32, u32)> {
    let n = n as i64;
    let m = m as i64;
    let delta = n - m;
    let max_d = (n + m + 1) / 2 + 1;
    let offset = max_d;
    let size = (2 * max_d + 1) as usize;

    // vf[offset + k] is the farthest x reached forward on diagonal k.
    // vb[offset + k'] is the farthest x' reached backward (in reversed
    // coordinates) on diagonal k'. Packed as plain i64 here; the spec's
    // packed-snake-array framing is Histogram-specific, Myers only needs
    // scalar frontiers.
    let mut vf = vec![0i64; size];
    let mut vb = vec![0i64; size];
    vf[(offset + 1) as usize] = 0;
    vb[(offset + 1) as usize] = 0;

    let eq = |x: i64, y: i64| cmp.eq(a, base_a + x as u32, b, base_b + y as u32);
    let eq_rev =
        |xp: i64, yp: i64| cmp.eq(a, base_a + (n - xp - 1) as u32, b, base_b + (m - yp - 1) as u32);

    for d in 0..=max_d {
        cancel.check()?;

        let mut k = -d;
        while k <= d {
            let idx = (offset + k) as usize;
            let down = k == -d || (k != d && vf[idx - 1] < vf[idx + 1]);
            let mut x = if down { vf[idx + 1] } else { vf[idx - 1] + 1 };
            let mut y = x - k;
            while x < n && y < m && eq(x, y) {
                x += 1;
                y += 1;
            }
            vf[idx] = x;

            if d > 0 {
                let kp = delta - k;
                if kp >= -(d - 1) && kp <= d - 1 {
                    let bidx = (offset + kp) as usize;
                    let bx = n - vb[bidx];
                    if bx <= x {
                        return Ok((x.min(n) as u32, y.min(m) as u32));
                    }
                }
            }
            k += 2;
        }

        let mut k = -d;
        while k <= d {
            let idx = (offset + k) as usize;
            let down = k == -d || (k != d && vb[idx - 1] < vb[idx + 1]);
            let mut xp = if down { vb[idx + 1] } else { vb[idx - 1] + 1 };
            let mut yp = xp - k;
            while xp < n && yp < m && eq_rev(xp, yp) {
                xp += 1;
                yp += 1;
            }
            vb[idx] = xp;

            if d > 0 {
                let kk = delta - k;
                if kk >= -(d - 1) && kk <= d - 1 {
                    let fidx = (offset + kk) as usize;
                    let fx = vf[fidx];
                    let bx = n - xp;
                    if bx <= fx {
                        let split_x = bx.max(0).min(n);
                        let split_y = (m - yp).max(0).min(m);
                        return Ok((split_x as u32, split_y as u32));
                    }
                }
            }
            k += 2;
        }
    }

    // Both sequences are non-empty and d grows to cover n+m, so a crossing
    // is always found above; this is an unreachable safety net.
    Ok(((n / 2) as u32, (m / 2) as u32))
}

/// Convenience: diff two sequences with Myers directly, without going
/// through [`diff`](crate::diff::diff)'s common-end trimming or algorithm
/// selection. Mostly useful for tests and for Histogram's fallback path.
pub fn diff_myers<S: Sequence, C: Comparator<S>>(
    cmp: &C,
    a: &S,
    b: &S,
    region: Region,
    out: &mut EditList,
    cancel: &CancellationToken,
) -> Result<()> {
    Myers.diff_non_common(cmp, a, b, region, out, cancel)
}
