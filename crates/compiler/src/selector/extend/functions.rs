#![allow(clippy::similar_names)]

use std::collections::VecDeque;

use super::super::{
    components_are_superselector, Combinator, NotRule, Sequence, SequenceComponent,
    SimpleSelector, SimpleSequence,
};

type Components = Vec<SequenceComponent>;

/// Expands "parenthesized selectors" in `path`.
///
/// That is, if we have `.A .B {@extend .C}` and `.D .C {...}`, this
/// conceptually expands into `.D .C, .D (.A .B)`, and this function translates
/// `.D (.A .B)` into `.D .A .B, .A .D .B`. For thoroughness, `.A.D .B` would
/// also be required, but including merged selectors results in exponential
/// output for very little gain.
///
/// The selector `.D (.A .B)` is represented as the list `[[.D], [.A, .B]]`.
pub(crate) fn weave(path: Vec<Components>) -> Vec<Components> {
    let mut prefixes: Vec<Components> = vec![Vec::new()];

    for mut current in path {
        let last = match current.pop() {
            Some(last) => last,
            None => continue,
        };

        let mut new_prefixes = Vec::with_capacity(prefixes.len());
        for prefix in prefixes {
            if let Some(woven) = subweave(prefix, current.clone()) {
                for mut seq in woven {
                    seq.push(last.clone());
                    new_prefixes.push(seq);
                }
            }
        }
        prefixes = new_prefixes;
    }

    prefixes
}

/// Interweaves `seq1` and `seq2` as parents of the same target selector.
///
/// Returns all possible orderings of the selectors in the inputs (including
/// using unification) that maintain the relative ordering of the input. For
/// example, given `.foo .bar` and `.baz .bang`, this would return `.foo .bar
/// .baz .bang`, `.foo .bar.baz .bang`, `.foo .baz .bar .bang`, `.foo .baz
/// .bar.bang`, `.foo .baz .bang .bar`, and so on until `.baz .bang .foo .bar`.
///
/// Some orderings are elided to reduce the size of the output. Returns `None`
/// if the two can't be merged.
pub(crate) fn subweave(seq1: Components, seq2: Components) -> Option<Vec<Components>> {
    if seq1.is_empty() {
        return Some(vec![seq2]);
    }
    if seq2.is_empty() {
        return Some(vec![seq1]);
    }

    let mut queue1 = VecDeque::from(seq1);
    let mut queue2 = VecDeque::from(seq2);

    let init = merge_initial_ops(&mut queue1, &mut queue2)?;
    let fin = merge_final_ops(&mut queue1, &mut queue2)?;

    // only one `:root` may appear in the output
    match (first_if_root(&mut queue1), first_if_root(&mut queue2)) {
        (Some(root1), Some(root2)) => {
            let root = SequenceComponent::Compound(root1.unify(&root2)?);
            queue1.push_front(root.clone());
            queue2.push_front(root);
        }
        (Some(root1), None) => queue2.push_front(SequenceComponent::Compound(root1)),
        (None, Some(root2)) => queue1.push_front(SequenceComponent::Compound(root2)),
        (None, None) => {}
    }

    let mut groups1 = group_selectors(Vec::from(queue1));
    let mut groups2 = group_selectors(Vec::from(queue2));

    let lcs = longest_common_subsequence(
        groups2.make_contiguous(),
        groups1.make_contiguous(),
        |s1, s2| {
            if s1 == s2 {
                return Some(s1.clone());
            }

            if !s1.first()?.is_compound() || !s2.first()?.is_compound() {
                return None;
            }

            if parent_superselector(s1, s2) {
                return Some(s2.clone());
            }
            if parent_superselector(s2, s1) {
                return Some(s1.clone());
            }

            if !must_unify(s1, s2) {
                return None;
            }

            let unified = Sequence::new(s1.clone()).unify(&Sequence::new(s2.clone()))?;
            match unified.members() {
                [only] => Some(only.members().to_vec()),
                _ => None,
            }
        },
    );

    let mut choices: Vec<Vec<Components>> = vec![vec![init]];

    for group in lcs {
        choices.push(
            chunks(&mut groups1, &mut groups2, |queue| match queue.front() {
                Some(front) => parent_superselector(front, &group),
                None => true,
            })
            .into_iter()
            .map(|chunk| chunk.into_iter().flatten().collect())
            .collect(),
        );
        choices.push(vec![group]);
        groups1.pop_front();
        groups2.pop_front();
    }

    choices.push(
        chunks(&mut groups1, &mut groups2, VecDeque::is_empty)
            .into_iter()
            .map(|chunk| chunk.into_iter().flatten().collect())
            .collect(),
    );

    choices.extend(fin);

    Some(
        paths(
            choices
                .into_iter()
                .filter(|choice| !choice.is_empty())
                .collect(),
        )
        .into_iter()
        .map(|path| path.into_iter().flatten().collect::<Components>())
        .filter(|path| !has_two_subjects(path))
        .collect(),
    )
}

/// Extracts leading combinators and line breaks from `seq1` and `seq2` and
/// merges them together into a single list.
///
/// If there are no combinators to be merged, returns an empty list. If the
/// combinators can't be merged, returns `None`.
fn merge_initial_ops(
    seq1: &mut VecDeque<SequenceComponent>,
    seq2: &mut VecDeque<SequenceComponent>,
) -> Option<Components> {
    let mut ops1 = Vec::new();
    while seq1.front().map_or(false, SequenceComponent::is_op) {
        ops1.extend(seq1.pop_front());
    }

    let mut ops2 = Vec::new();
    while seq2.front().map_or(false, SequenceComponent::is_op) {
        ops2.extend(seq2.pop_front());
    }

    let mut newline = false;
    if ops1.first().map_or(false, SequenceComponent::is_newline) {
        ops1.remove(0);
        newline = true;
    }
    if ops2.first().map_or(false, SequenceComponent::is_newline) {
        ops2.remove(0);
        newline = true;
    }

    // if neither is a subsequence of the other, they can't be merged
    let lcs = longest_common_subsequence(&ops1, &ops2, |a, b| (a == b).then(|| a.clone()));
    if lcs != ops1 && lcs != ops2 {
        return None;
    }

    let mut merged = Vec::new();
    if newline {
        merged.push(SequenceComponent::Newline);
    }
    merged.extend(if ops1.len() > ops2.len() { ops1 } else { ops2 });

    Some(merged)
}

/// Extracts trailing combinators, and the compounds they apply to, from `seq1`
/// and `seq2` and merges them together into a list of choices.
///
/// If there are no combinators to be merged, returns an empty list. If the
/// sequences can't be merged, returns `None`.
fn merge_final_ops(
    seq1: &mut VecDeque<SequenceComponent>,
    seq2: &mut VecDeque<SequenceComponent>,
) -> Option<Vec<Vec<Components>>> {
    let mut result: VecDeque<Vec<Components>> = VecDeque::new();

    loop {
        // line breaks only matter at the start of a selector
        let ops1 = pop_trailing_combinators(seq1);
        let ops2 = pop_trailing_combinators(seq2);

        if ops1.is_empty() && ops2.is_empty() {
            return Some(Vec::from(result));
        }

        if ops1.len() > 1 || ops2.len() > 1 {
            // if one is a supersequence of the other, use that, otherwise
            // give up
            let lcs = longest_common_subsequence(&ops1, &ops2, |a, b| (a == b).then(|| *a));
            if lcs != ops1 && lcs != ops2 {
                return None;
            }

            let longest = if ops1.len() > ops2.len() { ops1 } else { ops2 };
            result.push_front(vec![longest
                .into_iter()
                .rev()
                .map(SequenceComponent::Combinator)
                .collect()]);

            return Some(Vec::from(result));
        }

        match (ops1.first().copied(), ops2.first().copied()) {
            (Some(op1), Some(op2)) => {
                let sel1 = pop_compound(seq1)?;
                let sel2 = pop_compound(seq2)?;

                match (op1, op2) {
                    (Combinator::FollowingSibling, Combinator::FollowingSibling) => {
                        if sel1.superselector_with(&sel2, &[], NotRule::Strict) {
                            result.push_front(vec![followed_by(sel2, op1)]);
                        } else if sel2.superselector_with(&sel1, &[], NotRule::Strict) {
                            result.push_front(vec![followed_by(sel1, op1)]);
                        } else {
                            let merged = sel1.unify(&sel2);
                            let mut options = vec![
                                vec![
                                    SequenceComponent::Compound(sel1.clone()),
                                    SequenceComponent::Combinator(op1),
                                    SequenceComponent::Compound(sel2.clone()),
                                    SequenceComponent::Combinator(op1),
                                ],
                                vec![
                                    SequenceComponent::Compound(sel2),
                                    SequenceComponent::Combinator(op1),
                                    SequenceComponent::Compound(sel1),
                                    SequenceComponent::Combinator(op1),
                                ],
                            ];
                            options.extend(merged.map(|merged| followed_by(merged, op1)));
                            result.push_front(options);
                        }
                    }
                    (Combinator::FollowingSibling, Combinator::NextSibling)
                    | (Combinator::NextSibling, Combinator::FollowingSibling) => {
                        let (tilde_sel, plus_sel) = if op1 == Combinator::FollowingSibling {
                            (sel1, sel2)
                        } else {
                            (sel2, sel1)
                        };

                        if tilde_sel.superselector_with(&plus_sel, &[], NotRule::Strict) {
                            result.push_front(vec![followed_by(
                                plus_sel,
                                Combinator::NextSibling,
                            )]);
                        } else {
                            let merged = plus_sel.unify(&tilde_sel);
                            let mut options = vec![vec![
                                SequenceComponent::Compound(tilde_sel),
                                SequenceComponent::Combinator(Combinator::FollowingSibling),
                                SequenceComponent::Compound(plus_sel),
                                SequenceComponent::Combinator(Combinator::NextSibling),
                            ]];
                            options.extend(
                                merged.map(|merged| followed_by(merged, Combinator::NextSibling)),
                            );
                            result.push_front(options);
                        }
                    }
                    (Combinator::Child, Combinator::NextSibling | Combinator::FollowingSibling) => {
                        result.push_front(vec![followed_by(sel2, op2)]);
                        seq1.push_back(SequenceComponent::Compound(sel1));
                        seq1.push_back(SequenceComponent::Combinator(op1));
                    }
                    (Combinator::NextSibling | Combinator::FollowingSibling, Combinator::Child) => {
                        result.push_front(vec![followed_by(sel1, op1)]);
                        seq2.push_back(SequenceComponent::Compound(sel2));
                        seq2.push_back(SequenceComponent::Combinator(op2));
                    }
                    _ => {
                        if op1 != op2 {
                            return None;
                        }

                        let merged = sel1.unify(&sel2)?;
                        result.push_front(vec![followed_by(merged, op1)]);
                    }
                }
            }
            (Some(op1), None) => {
                if op1 == Combinator::Child {
                    if let (
                        Some(SequenceComponent::Compound(last1)),
                        Some(SequenceComponent::Compound(last2)),
                    ) = (seq1.back(), seq2.back())
                    {
                        if last2.superselector_with(last1, &[], NotRule::Strict) {
                            seq2.pop_back();
                        }
                    }
                }

                result.push_front(vec![popped_with(seq1, op1)]);
            }
            (None, Some(op2)) => {
                if op2 == Combinator::Child {
                    if let (
                        Some(SequenceComponent::Compound(last1)),
                        Some(SequenceComponent::Compound(last2)),
                    ) = (seq1.back(), seq2.back())
                    {
                        if last1.superselector_with(last2, &[], NotRule::Strict) {
                            seq1.pop_back();
                        }
                    }
                }

                result.push_front(vec![popped_with(seq2, op2)]);
            }
            (None, None) => return Some(Vec::from(result)),
        }
    }
}

/// Removes trailing combinators and line breaks from `seq`, returning the
/// combinators in reverse order
fn pop_trailing_combinators(seq: &mut VecDeque<SequenceComponent>) -> Vec<Combinator> {
    let mut ops = Vec::new();
    while let Some(component) = seq.back() {
        match component {
            SequenceComponent::Combinator(combinator) => ops.push(*combinator),
            SequenceComponent::Newline => {}
            SequenceComponent::Compound(..) => break,
        }
        seq.pop_back();
    }
    ops
}

fn pop_compound(seq: &mut VecDeque<SequenceComponent>) -> Option<SimpleSequence> {
    match seq.pop_back()? {
        SequenceComponent::Compound(compound) => Some(compound),
        _ => None,
    }
}

fn followed_by(compound: SimpleSequence, combinator: Combinator) -> Components {
    vec![
        SequenceComponent::Compound(compound),
        SequenceComponent::Combinator(combinator),
    ]
}

/// Pops the last member of `seq`, if any, and follows it with `combinator`
fn popped_with(seq: &mut VecDeque<SequenceComponent>, combinator: Combinator) -> Components {
    let mut components: Components = seq.pop_back().into_iter().collect();
    components.push(SequenceComponent::Combinator(combinator));
    components
}

/// Returns the longest common subsequence between `list1` and `list2`.
///
/// `select` decides whether two elements match; it returns the element to
/// include in the result, or `None` if they are unequal.
///
/// If there is more than one equally long common subsequence, the one whose
/// elements appear last in `list2` is preferred.
pub(crate) fn longest_common_subsequence<T, R>(
    list1: &[T],
    list2: &[T],
    select: impl Fn(&T, &T) -> Option<R>,
) -> Vec<R> {
    let mut lengths = vec![vec![0_usize; list2.len() + 1]; list1.len() + 1];
    let mut selections: Vec<Vec<Option<R>>> = Vec::with_capacity(list1.len());

    for (i, x) in list1.iter().enumerate() {
        let mut row = Vec::with_capacity(list2.len());
        for (j, y) in list2.iter().enumerate() {
            let selection = select(x, y);
            lengths[i + 1][j + 1] = if selection.is_some() {
                lengths[i][j] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
            row.push(selection);
        }
        selections.push(row);
    }

    let mut result = Vec::new();
    let (mut i, mut j) = (list1.len(), list2.len());
    while i > 0 && j > 0 {
        if let Some(selection) = selections[i - 1][j - 1].take() {
            result.push(selection);
            i -= 1;
            j -= 1;
        } else if lengths[i][j - 1] > lengths[i - 1][j] {
            j -= 1;
        } else {
            i -= 1;
        }
    }

    result.reverse();
    result
}

/// If the first element of `queue` has a `:root` selector, removes and returns
/// that element.
fn first_if_root(queue: &mut VecDeque<SequenceComponent>) -> Option<SimpleSequence> {
    match queue.front() {
        Some(SequenceComponent::Compound(compound)) if has_root(compound) => {}
        _ => return None,
    }

    pop_front_compound(queue)
}

fn pop_front_compound(queue: &mut VecDeque<SequenceComponent>) -> Option<SimpleSequence> {
    match queue.pop_front()? {
        SequenceComponent::Compound(compound) => Some(compound),
        _ => None,
    }
}

/// Returns whether `compound` contains a `:root` selector
fn has_root(compound: &SimpleSequence) -> bool {
    compound.members().iter().any(|simple| match simple {
        SimpleSelector::Pseudo(pseudo) => pseudo.is_class() && pseudo.normalized_name() == "root",
        _ => false,
    })
}

/// Returns `seq`, grouped into sub-lists such that no sub-list contains two
/// adjacent compounds.
///
/// For example, `(A B > C D + E ~ > G)` is grouped into
/// `[(A) (B > C) (D + E ~ > G)]`.
fn group_selectors(seq: Components) -> VecDeque<Components> {
    let mut groups: VecDeque<Components> = VecDeque::new();

    for component in seq {
        match groups.back_mut() {
            Some(group)
                if component.is_op() || group.last().map_or(false, SequenceComponent::is_op) =>
            {
                group.push(component);
            }
            _ => groups.push_back(vec![component]),
        }
    }

    groups
}

/// Returns all orderings of initial subsequences of `queue1` and `queue2`.
///
/// The `done` callback is used to determine the extent of the initial
/// subsequences. It's called with each queue until it returns `true`.
///
/// This destructively removes the initial subsequences of `queue1` and
/// `queue2`.
///
/// For example, given `(A B C | D E)` and `(1 2 | 3 4 5)` (with `|` denoting
/// the boundary of the initial subsequence), this would return `[(A B C 1 2),
/// (1 2 A B C)]`. The queues would then contain `(D E)` and `(3 4 5)`.
fn chunks<T: Clone>(
    queue1: &mut VecDeque<T>,
    queue2: &mut VecDeque<T>,
    done: impl Fn(&VecDeque<T>) -> bool,
) -> Vec<Vec<T>> {
    let mut chunk1 = Vec::new();
    while !done(queue1) {
        match queue1.pop_front() {
            Some(item) => chunk1.push(item),
            None => break,
        }
    }

    let mut chunk2 = Vec::new();
    while !done(queue2) {
        match queue2.pop_front() {
            Some(item) => chunk2.push(item),
            None => break,
        }
    }

    match (chunk1.is_empty(), chunk2.is_empty()) {
        (true, true) => Vec::new(),
        (true, false) => vec![chunk2],
        (false, true) => vec![chunk1],
        (false, false) => {
            let mut first = chunk1.clone();
            first.extend(chunk2.iter().cloned());

            let mut second = chunk2;
            second.extend(chunk1);

            vec![first, second]
        }
    }
}

/// Like [`components_are_superselector`], but compares `seq1` and `seq2` as
/// though they shared an implicit base compound.
///
/// For example, `B` is not normally a superselector of `B A`, since it doesn't
/// match elements that match `A`. However, it *is* a parent superselector,
/// since `B X` is a superselector of `B A X`.
fn parent_superselector(seq1: &[SequenceComponent], seq2: &[SequenceComponent]) -> bool {
    let base = SequenceComponent::Compound(SimpleSequence::new(
        vec![SimpleSelector::placeholder("<temp>")],
        false,
    ));

    let mut seq1 = seq1.to_vec();
    seq1.push(base.clone());
    let mut seq2 = seq2.to_vec();
    seq2.push(base);

    components_are_superselector(&seq1, &seq2, NotRule::Strict)
}

/// Returns a list of all possible paths through the given lists.
///
/// For example, given `[[1, 2], [3, 4], [5]]`, this returns:
///
/// ```no_run
/// [[1, 3, 5],
///  [2, 3, 5],
///  [1, 4, 5],
///  [2, 4, 5]];
/// ```
pub(crate) fn paths<T: Clone>(choices: Vec<Vec<T>>) -> Vec<Vec<T>> {
    choices.into_iter().fold(vec![vec![]], |paths, choice| {
        choice
            .into_iter()
            .flat_map(move |option| {
                paths.clone().into_iter().map(move |mut path| {
                    path.push(option.clone());
                    path
                })
            })
            .collect()
    })
}

/// Returns whether `seq1` and `seq2` need to be unified to produce a valid
/// combined selector.
///
/// This is necessary when both selectors contain the same unique simple
/// selector, such as an ID.
fn must_unify(seq1: &[SequenceComponent], seq2: &[SequenceComponent]) -> bool {
    let unique_selectors: Vec<&SimpleSelector> = seq1
        .iter()
        .filter_map(SequenceComponent::as_compound)
        .flat_map(|compound| compound.members())
        .filter(|simple| simple.is_unique())
        .collect();

    if unique_selectors.is_empty() {
        return false;
    }

    seq2.iter()
        .filter_map(SequenceComponent::as_compound)
        .flat_map(|compound| compound.members())
        .any(|simple| simple.is_unique() && unique_selectors.contains(&simple))
}

/// Whether more than one compound in `path` carries the `!` subject marker
fn has_two_subjects(path: &[SequenceComponent]) -> bool {
    path.iter()
        .filter_map(SequenceComponent::as_compound)
        .filter(|compound| compound.is_subject())
        .nth(1)
        .is_some()
}

/// Removes redundant selectors from the woven `groups`, then flattens them.
///
/// A selector is redundant if a selector from a different group is its
/// superselector and at least as specific as the extenders that produced it.
/// `protected` is never removed. Beyond `threshold` groups, nothing is trimmed.
pub(crate) fn trim(
    groups: Vec<Vec<Sequence>>,
    threshold: usize,
    protected: Option<&Sequence>,
) -> Vec<Sequence> {
    if groups.len() > threshold {
        return groups.into_iter().flatten().collect();
    }

    // trimmed results are kept apart so two identical selectors can't
    // mutually trim one another
    let mut result: Vec<Vec<Sequence>> = Vec::with_capacity(groups.len());

    for (i, group) in groups.iter().enumerate() {
        let kept = group
            .iter()
            .filter(|seq1| {
                if protected == Some(*seq1) {
                    return true;
                }

                let max_specificity = seq1.max_source_specificity();

                let redundant = result
                    .iter()
                    .chain(groups.iter().skip(i + 1))
                    .flatten()
                    .any(|seq2| {
                        seq2.specificity().min >= max_specificity
                            && components_are_superselector(
                                seq2.members(),
                                seq1.members(),
                                NotRule::Strict,
                            )
                    });

                !redundant
            })
            .cloned()
            .collect();

        result.push(kept);
    }

    result.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use crate::selector::parse_for_tests;

    use super::*;

    fn components(text: &str) -> Components {
        parse_for_tests(text).members()[0].members().to_vec()
    }

    fn render(seqs: Vec<Components>) -> Vec<String> {
        seqs.into_iter()
            .map(|seq| Sequence::new(seq).to_string())
            .collect()
    }

    #[test]
    fn paths_enumerate_every_choice() {
        assert_eq!(
            paths(vec![vec![1, 2], vec![3, 4], vec![5]]),
            [[1, 3, 5], [2, 3, 5], [1, 4, 5], [2, 4, 5]]
        );
        assert_eq!(paths::<i32>(Vec::new()), [Vec::<i32>::new()]);
    }

    #[test]
    fn lcs_of_plain_lists() {
        let lcs = longest_common_subsequence(&[1, 2, 3, 4], &[2, 4, 5], |a, b| {
            (a == b).then(|| *a)
        });
        assert_eq!(lcs, [2, 4]);
    }

    #[test]
    fn groups_keep_combinators_with_neighbours() {
        let groups = group_selectors(components("a b > c d + e ~ g"));
        assert_eq!(
            groups.into_iter().map(|group| group.len()).collect::<Vec<_>>(),
            [1, 3, 5]
        );
    }

    #[test]
    fn subweave_interleaves_descendants() {
        let woven = subweave(components(".a"), components(".b")).unwrap();
        assert_eq!(render(woven), [".a .b", ".b .a"]);
    }

    #[test]
    fn subweave_results_match_both_contexts() {
        let target = components(".t");
        let in_context = |mut prefix: Components| {
            prefix.extend(target.iter().cloned());
            Sequence::new(prefix)
        };

        let first = in_context(components(".a"));
        let second = in_context(components(".b"));

        for woven in subweave(components(".a"), components(".b")).unwrap() {
            let woven = in_context(woven);
            assert!(first.is_superselector(&woven), "{}", woven);
            assert!(second.is_superselector(&woven), "{}", woven);
        }
    }

    #[test]
    fn subweave_orders_child_chains() {
        let woven = subweave(components(".a > .b"), components(".a > .c")).unwrap();
        assert_eq!(render(woven), [".a > .b .a > .c", ".a > .c .a > .b"]);
    }

    #[test]
    fn subweave_with_empty_side() {
        let woven = subweave(Vec::new(), components(".b")).unwrap();
        assert_eq!(render(woven), [".b"]);
    }

    #[test]
    fn subweave_shares_common_parents() {
        let woven = subweave(components(".a > .b >"), components(".a > .c >")).unwrap();
        assert_eq!(render(woven), [".a > .c.b >"]);

        assert!(subweave(components("#a >"), components("#b >")).is_none());

        let woven = subweave(components(".x .a"), components(".x .b")).unwrap();
        assert_eq!(render(woven), [".x .a .b", ".x .b .a"]);
    }

    #[test]
    fn subweave_unifies_unique_selectors() {
        let woven = subweave(components("#a.b .x"), components("#a.c .y")).unwrap();
        assert_eq!(render(woven), ["#a.c.b .x .y", "#a.c.b .y .x"]);
    }

    #[test]
    fn siblings_merge_into_one_choice() {
        let woven = subweave(components(".a ~"), components(".a ~")).unwrap();
        assert_eq!(render(woven), [".a ~"]);

        let woven = subweave(components(".a ~"), components(".b +")).unwrap();
        assert_eq!(render(woven), [".a ~ .b +", ".a.b +"]);
    }

    #[test]
    fn weave_appends_each_group_target() {
        let woven = weave(vec![components(".a"), components(".b .c")]);
        assert_eq!(render(woven), [".a .b .c", ".b .a .c"]);
    }

    #[test]
    fn trim_drops_redundant_results() {
        let seq = |text: &str| parse_for_tests(text).members()[0].clone();
        let groups = vec![vec![seq(".a .b")], vec![seq(".a .b.c")]];
        let trimmed = trim(groups, 100, None);

        assert_eq!(trimmed, [seq(".a .b")]);
    }

    #[test]
    fn trim_keeps_protected_selector() {
        let seq = |text: &str| parse_for_tests(text).members()[0].clone();
        let groups = vec![vec![seq(".b.c")], vec![seq(".b")]];
        let protected = seq(".b.c");
        let trimmed = trim(groups, 100, Some(&protected));

        assert_eq!(trimmed, [seq(".b.c"), seq(".b")]);
    }

    #[test]
    fn trim_of_single_group_is_identity() {
        let seq = |text: &str| parse_for_tests(text).members()[0].clone();
        let group = vec![seq(".a"), seq(".a.b"), seq(".x .a")];

        assert_eq!(trim(vec![group.clone()], 100, None), group);
    }

    #[test]
    fn trim_keeps_selectors_a_not_only_overlaps() {
        let seq = |text: &str| parse_for_tests(text).members()[0].clone();
        let groups = vec![vec![seq(".c")], vec![seq(".b")], vec![seq(":not(.a)")]];

        assert_eq!(
            trim(groups, 100, None),
            [seq(".c"), seq(".b"), seq(":not(.a)")]
        );
    }

    #[test]
    fn trim_is_skipped_past_threshold() {
        let seq = |text: &str| parse_for_tests(text).members()[0].clone();
        let groups = vec![vec![seq(".a")], vec![seq(".a.b")]];

        assert_eq!(trim(groups.clone(), 1, None), [seq(".a"), seq(".a.b")]);
        assert_eq!(trim(groups, 2, None), [seq(".a")]);
    }
}
