use crate::api::{Comment, CommentId};

/// One post's comments, rebuilt wholesale from each flat snapshot the
/// backend subscription delivers. Replies are bucketed under their parent;
/// relative input order is preserved among roots and among siblings.
///
/// Cheap to clone (per-render snapshots), synchronous and IO-free.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Thread {
    comments: im::HashMap<CommentId, Comment>,
    roots: im::Vector<CommentId>,
    children: im::HashMap<CommentId, im::Vector<CommentId>>,
}

impl Thread {
    /// Single-pass partition of a flat comment list into a forest.
    ///
    /// A reply whose declared parent is absent from the snapshot (parent
    /// already deleted, child not yet reflected) is kept: it becomes an
    /// unparented node at depth 0, after the true roots, in input order.
    pub fn build(flat: Vec<Comment>) -> Thread {
        let mut comments = im::HashMap::new();
        let mut roots = im::Vector::new();
        let mut children: im::HashMap<CommentId, im::Vector<CommentId>> = im::HashMap::new();
        let order = flat.iter().map(|c| c.id).collect::<Vec<_>>();

        for c in flat {
            match c.reply_to {
                None => roots.push_back(c.id),
                Some(parent) => children.entry(parent).or_default().push_back(c.id),
            }
            comments.insert(c.id, c);
        }

        // Re-root replies whose parent never showed up in this snapshot
        for id in order {
            let parent = match comments.get(&id).and_then(|c| c.reply_to) {
                Some(parent) => parent,
                None => continue,
            };
            if !comments.contains_key(&parent) {
                tracing::warn!(
                    comment = ?id,
                    missing_parent = ?parent,
                    "reply to a comment absent from the snapshot, rendering unparented"
                );
                children.remove(&parent);
                roots.push_back(id);
            }
        }

        Thread {
            comments,
            roots,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.get(id)
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.comments.contains_key(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Comment> {
        self.roots.iter().filter_map(|id| self.comments.get(id))
    }

    pub fn children_of(&self, id: &CommentId) -> impl Iterator<Item = &Comment> {
        self.children
            .get(id)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.comments.get(id))
    }

    pub fn child_count(&self, id: &CommentId) -> usize {
        self.children.get(id).map(|ids| ids.len()).unwrap_or(0)
    }

    /// Pre-order depth-first walk: each node before any of its descendants,
    /// each sibling subtree fully emitted before the next sibling
    pub fn preorder(&self) -> Vec<(&Comment, usize)> {
        let mut res = Vec::with_capacity(self.comments.len());
        let mut stack = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, 0))
            .collect::<Vec<_>>();
        while let Some((id, depth)) = stack.pop() {
            let c = match self.comments.get(&id) {
                Some(c) => c,
                None => continue,
            };
            res.push((c, depth));
            if let Some(kids) = self.children.get(&id) {
                stack.extend(kids.iter().rev().map(|k| (*k, depth + 1)));
            }
        }
        res
    }

    /// Chain of parents from `id` outward, nearest first, stopping at the
    /// first ancestor absent from the snapshot
    pub fn ancestors_of(&self, id: &CommentId) -> Vec<CommentId> {
        let mut res = Vec::new();
        let mut cur = self.comments.get(id).and_then(|c| c.reply_to);
        while let Some(parent) = cur {
            match self.comments.get(&parent) {
                None => break,
                Some(c) => {
                    res.push(parent);
                    cur = c.reply_to;
                }
            }
        }
        res
    }

    /// Deletion closure: the target plus every comment whose `reply_to`
    /// chain reaches it, found by one-level expansion until fixpoint
    pub fn closure_of(&self, target: CommentId) -> Vec<CommentId> {
        let mut res = vec![target];
        let mut frontier = vec![target];
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for id in frontier {
                if let Some(kids) = self.children.get(&id) {
                    next.extend(kids.iter().copied());
                }
            }
            res.extend(next.iter().copied());
            frontier = next;
        }
        res
    }
}
