//! Fuzzy string similarity scoring for FAQ lookup

/// Scores how similar two strings are, in `[0.0, 1.0]`
///
/// Implementations must be deterministic: the same pair of inputs always
/// produces the same score, so ranking candidates yields a stable best match.
pub trait SimilarityScorer: Send + Sync {
    /// Score the similarity of `a` against `b`
    fn score(&self, a: &str, b: &str) -> f32;
}

/// Ratcliff/Obershelp sequence ratio
///
/// `2.0 * M / T` where `M` is the total length of matching blocks found by
/// recursive longest-common-substring decomposition and `T` is the combined
/// length of both inputs. Two empty strings score 1.0.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceRatio;

impl SimilarityScorer for SequenceRatio {
    fn score(&self, a: &str, b: &str) -> f32 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }

        let matches = matching_len(&a, &b);

        #[allow(clippy::cast_precision_loss)]
        {
            2.0 * matches as f32 / total as f32
        }
    }
}

/// Total length of matching blocks between `a` and `b`
///
/// Finds the longest common block, then recurses into the unmatched pieces
/// on each side of it.
fn matching_len(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_len(&a[..i], &b[..j]) + matching_len(&a[i + size..], &b[j + size..])
}

/// Longest common substring of `a` and `b` as `(start_a, start_b, len)`
///
/// Of all maximal blocks, returns the one starting earliest in `a`, and of
/// those the one starting earliest in `b`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0usize, 0usize, 0usize);

    // suffix-length table, rolled one row at a time
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                curr[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            } else {
                curr[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
        curr.fill(0);
    }

    best
}
