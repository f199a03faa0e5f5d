//! Stack growth for deep recursion.
//!
//! Concrete trees produced by a grammar parser nest one node per precedence
//! level, so a single operand in source text sits fifteen or more frames
//! deep, and prefix chains such as `not not not x` or `- - - x` add a frame
//! pair per operator. Lowering recurses along that nesting, so pathological
//! inputs can exhaust a default thread stack.
//!
//! Wrap the recursive entry points with [`ensure_sufficient_stack`]:
//!
//! ```text
//! fn lower_test(node: &ConcreteNode) -> LowerResult<Expr> {
//!     ensure_sufficient_stack(|| {
//!         // ... dispatch on node.kind ...
//!     })
//! }
//! ```
//!
//! On native targets the `stacker` crate grows the stack on demand. On WASM
//! the closure is called directly.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_result_through() {
        let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("rejected"));
        assert_eq!(result, Err("rejected"));
    }

    #[test]
    fn test_deeply_nested_prefix_chain() {
        // Mirrors lowering `- - - ... x`: one frame per prefix operator.
        fn count_prefixes(depth: u32) -> u32 {
            ensure_sufficient_stack(|| {
                if depth == 0 {
                    0
                } else {
                    count_prefixes(depth - 1) + 1
                }
            })
        }

        assert_eq!(count_prefixes(200_000), 200_000);
    }
}
