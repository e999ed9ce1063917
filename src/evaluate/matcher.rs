use std::collections::HashMap;

/// Maximal contiguous run of identical symbols present in both sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    /// Start of the run in the first (reference) sequence.
    pub a: usize,
    /// Start of the run in the second (user) sequence.
    pub b: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One edit-script step covering `[i1, i2)` of the reference sequence and
/// `[j1, j2)` of the user sequence. For `Replace` the two ranges may differ
/// in length; consumers pair index-wise up to the shorter side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

/// Greedy longest-common-block matching: repeatedly find the longest common
/// contiguous block of the unmatched remainders (ties broken by the
/// leftmost-earliest block in the reference, then in the user sequence),
/// recurse on both sides, then collapse adjacent blocks. The returned list is
/// ordered and terminated by a zero-size sentinel at `(a.len(), b.len())`.
pub fn matching_blocks(a: &[String], b: &[String]) -> Vec<MatchingBlock> {
    let mut b2j: HashMap<&str, Vec<usize>> = HashMap::new();
    for (j, symbol) in b.iter().enumerate() {
        b2j.entry(symbol.as_str()).or_default().push(j);
    }

    let mut pending = vec![(0usize, a.len(), 0usize, b.len())];
    let mut blocks = Vec::new();
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let found = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if found.size == 0 {
            continue;
        }
        if alo < found.a && blo < found.b {
            pending.push((alo, found.a, blo, found.b));
        }
        if found.a + found.size < ahi && found.b + found.size < bhi {
            pending.push((found.a + found.size, ahi, found.b + found.size, bhi));
        }
        blocks.push(found);
    }
    blocks.sort_unstable_by_key(|block| (block.a, block.b));

    // Collapse runs that split only because of the recursion boundaries.
    let mut collapsed: Vec<MatchingBlock> = Vec::with_capacity(blocks.len() + 1);
    for block in blocks {
        match collapsed.last_mut() {
            Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                last.size += block.size;
            }
            _ => collapsed.push(block),
        }
    }
    collapsed.push(MatchingBlock {
        a: a.len(),
        b: b.len(),
        size: 0,
    });
    collapsed
}

fn longest_match(
    a: &[String],
    b2j: &HashMap<&str, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let mut best = MatchingBlock {
        a: alo,
        b: blo,
        size: 0,
    };
    // j2len[j] = length of the longest run ending at (i, j); rebuilt per row.
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_j2len = HashMap::new();
        if let Some(positions) = b2j.get(a[i].as_str()) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let run = if j == 0 {
                    1
                } else {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                next_j2len.insert(j, run);
                if run > best.size {
                    best = MatchingBlock {
                        a: i + 1 - run,
                        b: j + 1 - run,
                        size: run,
                    };
                }
            }
        }
        j2len = next_j2len;
    }
    best
}

/// Derive the ordered edit-script from a sentinel-terminated block list: an
/// `Equal` per block and one gap opcode (`Replace`/`Delete`/`Insert`) per
/// unmatched stretch between blocks.
pub fn opcodes(blocks: &[MatchingBlock]) -> Vec<Opcode> {
    let mut ops = Vec::with_capacity(blocks.len() * 2);
    let (mut i, mut j) = (0usize, 0usize);
    for block in blocks {
        let gap_tag = match (i < block.a, j < block.b) {
            (true, true) => Some(OpTag::Replace),
            (true, false) => Some(OpTag::Delete),
            (false, true) => Some(OpTag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = gap_tag {
            ops.push(Opcode {
                tag,
                i1: i,
                i2: block.a,
                j1: j,
                j2: block.b,
            });
        }
        i = block.a + block.size;
        j = block.b + block.size;
        if block.size > 0 {
            ops.push(Opcode {
                tag: OpTag::Equal,
                i1: block.a,
                i2: i,
                j1: block.b,
                j2: j,
            });
        }
    }
    ops
}

/// Cheap similarity pre-check: total matched symbols over the longer
/// sequence's length. Two empty sequences are identical, so the ratio is 1.
pub fn block_match_ratio(a: &[String], b: &[String]) -> f64 {
    let total = a.len().max(b.len());
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(a, b).iter().map(|block| block.size).sum();
    matched as f64 / total as f64
}
