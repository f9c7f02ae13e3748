//! Hierarchical transform tree.
//!
//! A [`Node`] holds a transform relative to its parent, an ordered list of
//! children it owns, and at most one [`Drawable`]. Drawing a node composes
//! its local transform onto the ambient world transform handed down by the
//! parent, draws the attached drawable with the result, then recurses into
//! the children in insertion order.
//!
//! World transforms are never cached: every [`Node::draw`] recomputes them
//! from the root, so a change made with [`Node::transform`] is visible to
//! every descendant on the next draw.
//!
//! # Example
//!
//! ```
//! use glam::{Mat4, Vec3};
//! use marionette_scene::node::{Drawable, Node};
//! use marionette_scene::transform::{rotation_degrees, translation};
//!
//! struct Marker;
//!
//! impl Drawable for Marker {
//!     fn draw(&self, model: &Mat4, _view: &Mat4, _projection: &Mat4) {
//!         println!("marker at {}", model.transform_point3(Vec3::ZERO));
//!     }
//! }
//!
//! let mut root = Node::new(rotation_degrees(Vec3::X, 90.0));
//! let mut child = Node::new(translation(0.0, 0.0, -1.125));
//! child.add(Box::new(Marker));
//! root.add(child);
//!
//! root.draw(&Mat4::IDENTITY, &Mat4::IDENTITY, &Mat4::IDENTITY);
//! ```

use std::fmt;

use glam::Mat4;
use tracing::warn;

/// Anything that can render itself given model, view and projection matrices.
pub trait Drawable {
    /// Issue the draw. `model` is the world transform of the owning node.
    fn draw(&self, model: &Mat4, view: &Mat4, projection: &Mat4);
}

/// Something that can be added to a node: a child node or a drawable.
pub enum Attachment {
    Child(Node),
    Drawable(Box<dyn Drawable>),
}

impl From<Node> for Attachment {
    fn from(node: Node) -> Self {
        Attachment::Child(node)
    }
}

impl From<Box<dyn Drawable>> for Attachment {
    fn from(drawable: Box<dyn Drawable>) -> Self {
        Attachment::Drawable(drawable)
    }
}

impl<D: Drawable + 'static> From<Box<D>> for Attachment {
    fn from(drawable: Box<D>) -> Self {
        Attachment::Drawable(drawable)
    }
}

/// Route from a node to one of its descendants, as child indices.
///
/// The empty path addresses the node itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path addressing the root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// This path extended by one more child index.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of edges between the root and the addressed node.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the path addressing the root itself.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

/// One frame of a transform hierarchy.
pub struct Node {
    name: Option<String>,
    local: Mat4,
    children: Vec<Node>,
    drawable: Option<Box<dyn Drawable>>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("local", &self.local)
            .field("has_drawable", &self.drawable.is_some())
            .field("children", &self.children)
            .finish()
    }
}

impl Node {
    /// Create a node with no children and no drawable.
    pub fn new(local: Mat4) -> Self {
        Self {
            name: None,
            local,
            children: Vec::new(),
            drawable: None,
        }
    }

    /// Create a labelled node. The name only shows up in logs and lookups.
    pub fn named(name: impl Into<String>, local: Mat4) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(local)
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Transform relative to the parent frame.
    pub fn local_transform(&self) -> Mat4 {
        self.local
    }

    /// Replace the local transform outright.
    pub fn set_local_transform(&mut self, local: Mat4) {
        self.local = local;
    }

    /// Compose `delta` onto the local transform: `local = local * delta`.
    ///
    /// `delta` is expressed in this node's own frame, so a rotation turns the
    /// node about its own origin and a translation moves it along its own axes.
    pub fn transform(&mut self, delta: Mat4) {
        self.local *= delta;
    }

    /// Add a child node or attach a drawable.
    ///
    /// A node carries at most one drawable; attaching a second one replaces
    /// the first.
    pub fn add(&mut self, item: impl Into<Attachment>) {
        match item.into() {
            Attachment::Child(child) => {
                self.children.push(child);
            }
            Attachment::Drawable(drawable) => {
                if self.set_drawable(drawable).is_some() {
                    warn!(
                        node = self.name.as_deref().unwrap_or("<unnamed>"),
                        "replaced an attached drawable"
                    );
                }
            }
        }
    }

    /// Append a child and return its index among this node's children.
    pub fn add_child(&mut self, child: Node) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    /// Attach a drawable, returning the one it replaces.
    pub fn set_drawable(&mut self, drawable: Box<dyn Drawable>) -> Option<Box<dyn Drawable>> {
        self.drawable.replace(drawable)
    }

    /// Detach and return the drawable.
    pub fn take_drawable(&mut self) -> Option<Box<dyn Drawable>> {
        self.drawable.take()
    }

    pub fn drawable(&self) -> Option<&dyn Drawable> {
        self.drawable.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    /// True when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Descendant addressed by `path`.
    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        path.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Mutable descendant addressed by `path`.
    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        path.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Path to the first node named `name`, searching depth-first pre-order.
    pub fn find(&self, name: &str) -> Option<NodePath> {
        if self.name.as_deref() == Some(name) {
            return Some(NodePath::root());
        }
        self.children.iter().enumerate().find_map(|(index, child)| {
            child.find(name).map(|sub| {
                let mut indices = Vec::with_capacity(sub.len() + 1);
                indices.push(index);
                indices.extend_from_slice(sub.indices());
                NodePath::new(indices)
            })
        })
    }

    /// World transform of the node at `path`, given this node's ambient
    /// (parent) world transform.
    pub fn world_transform_of(&self, path: &NodePath, world: &Mat4) -> Option<Mat4> {
        let mut node = self;
        let mut accumulated = *world * node.local;
        for &index in path.indices() {
            node = node.children.get(index)?;
            accumulated *= node.local;
        }
        Some(accumulated)
    }

    /// Draw this subtree.
    ///
    /// `world` is the parent's world transform (identity for the root).
    /// The attached drawable receives `world * local`; children receive the
    /// same product as their ambient transform. View and projection are
    /// passed through unchanged.
    pub fn draw(&self, world: &Mat4, view: &Mat4, projection: &Mat4) {
        let world = *world * self.local;

        if let Some(drawable) = &self.drawable {
            drawable.draw(&world, view, projection);
        }

        for child in &self.children {
            child.draw(&world, view, projection);
        }
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Number of drawables in this subtree.
    pub fn drawable_count(&self) -> usize {
        usize::from(self.drawable.is_some())
            + self.children.iter().map(Node::drawable_count).sum::<usize>()
    }

    /// Longest root-to-leaf edge count.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;
    use crate::transform::{Transform, rotation_degrees, translation};

    const EPSILON: f32 = 1e-5;

    #[derive(Clone, Debug, PartialEq)]
    struct Call {
        id: &'static str,
        model: Mat4,
        view: Mat4,
        projection: Mat4,
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct Recorder {
        id: &'static str,
        log: Log,
    }

    impl Drawable for Recorder {
        fn draw(&self, model: &Mat4, view: &Mat4, projection: &Mat4) {
            self.log.borrow_mut().push(Call {
                id: self.id,
                model: *model,
                view: *view,
                projection: *projection,
            });
        }
    }

    fn recorder(id: &'static str, log: &Log) -> Box<Recorder> {
        Box::new(Recorder {
            id,
            log: Rc::clone(log),
        })
    }

    fn model_of(log: &Log, id: &str) -> Mat4 {
        log.borrow()
            .iter()
            .find(|call| call.id == id)
            .map(|call| call.model)
            .unwrap_or_else(|| panic!("{id} was not drawn"))
    }

    fn draw_root(root: &Node) {
        root.draw(&Mat4::IDENTITY, &Mat4::IDENTITY, &Mat4::IDENTITY);
    }

    #[test]
    fn test_world_composition_order() {
        let log = Log::default();
        let r = rotation_degrees(Vec3::Y, 90.0);
        let c = translation(1.0, 0.0, 0.0);

        let mut child = Node::new(c);
        child.add(recorder("child", &log));
        let mut root = Node::new(r);
        root.add(child);

        draw_root(&root);

        let model = model_of(&log, "child");
        assert!(model.abs_diff_eq(r * c, EPSILON));
        assert!(!model.abs_diff_eq(c * r, EPSILON));
        assert!(!model.abs_diff_eq(c, EPSILON));
    }

    #[test]
    fn test_spine_to_clavicle_scenario() {
        let log = Log::default();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(45f32.to_radians(), 1.0, 0.1, 100.0);

        let mut root = Node::new(rotation_degrees(Vec3::X, 90.0));
        let mut child = Node::new(translation(0.0, 0.0, -1.125));
        child.add(recorder("sphere", &log));
        root.add(child);

        root.draw(&Mat4::IDENTITY, &view, &projection);

        let calls = log.borrow();
        assert_eq!(calls.len(), 1);
        let expected = rotation_degrees(Vec3::X, 90.0) * translation(0.0, 0.0, -1.125);
        assert!(calls[0].model.abs_diff_eq(expected, EPSILON));
        assert_eq!(calls[0].view, view);
        assert_eq!(calls[0].projection, projection);

        // The sphere's origin ends up at +Y after the quarter turn about X
        let origin = calls[0].model.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 1.125, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_parent_change_propagates_to_descendants() {
        let log = Log::default();
        let mut grandchild = Node::new(translation(0.0, 0.0, 2.0));
        grandchild.add(recorder("grandchild", &log));
        let mut child = Node::new(translation(1.0, 0.0, 0.0));
        child.add(recorder("child", &log));
        child.add(grandchild);
        let mut root = Node::default();
        root.add(child);

        draw_root(&root);
        let before_child = model_of(&log, "child");
        let before_grandchild = model_of(&log, "grandchild");
        log.borrow_mut().clear();

        let delta = rotation_degrees(Vec3::Z, 45.0);
        root.transform(delta);
        draw_root(&root);

        assert!(model_of(&log, "child").abs_diff_eq(delta * before_child, EPSILON));
        assert!(
            model_of(&log, "grandchild").abs_diff_eq(delta * before_grandchild, EPSILON)
        );
    }

    #[test]
    fn test_sibling_independence() {
        let log = Log::default();
        let mut left = Node::new(translation(-1.0, 0.0, 0.0));
        left.add(recorder("left", &log));
        let mut right = Node::new(translation(1.0, 0.0, 0.0));
        right.add(recorder("right", &log));

        let mut root = Node::new(translation(0.0, 5.0, 0.0));
        let left_ix = root.add_child(left);
        root.add(right);

        draw_root(&root);
        let right_before = model_of(&log, "right");
        log.borrow_mut().clear();

        root.child_mut(left_ix)
            .expect("left child")
            .transform(rotation_degrees(Vec3::Y, 60.0));
        draw_root(&root);

        assert_eq!(model_of(&log, "right"), right_before);
        assert_ne!(model_of(&log, "left"), right_before);
    }

    #[test]
    fn test_ancestors_unaffected_by_child_change() {
        let log = Log::default();
        let mut child = Node::new(translation(0.0, 1.0, 0.0));
        child.add(recorder("child", &log));
        let mut root = Node::new(translation(3.0, 0.0, 0.0));
        root.add(recorder("root", &log));
        root.add(child);

        draw_root(&root);
        let root_before = model_of(&log, "root");
        log.borrow_mut().clear();

        root.get_mut(&NodePath::from([0]))
            .expect("child")
            .transform(translation(0.0, 0.0, 9.0));
        draw_root(&root);

        assert_eq!(model_of(&log, "root"), root_before);
    }

    #[test]
    fn test_draw_is_idempotent() {
        let log = Log::default();
        let mut child = Node::new(translation(0.0, 2.0, 0.0));
        child.add(recorder("child", &log));
        let mut root = Node::new(rotation_degrees(Vec3::X, 30.0));
        root.add(recorder("root", &log));
        root.add(child);

        draw_root(&root);
        draw_root(&root);

        let calls = log.borrow();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], calls[2]);
        assert_eq!(calls[1], calls[3]);
    }

    #[test]
    fn test_empty_node_draws_nothing() {
        let log = Log::default();
        let root = Node::default();
        draw_root(&root);

        assert!(log.borrow().is_empty());
        assert_eq!(root.node_count(), 1);
        assert_eq!(root.drawable_count(), 0);
        assert_eq!(root.depth(), 0);
        assert!(root.is_leaf());
    }

    #[test]
    fn test_transform_accumulates_on_the_right() {
        let initial = translation(0.0, 0.0, -0.75);
        let mut node = Node::new(initial);

        for _ in 0..30 {
            node.transform(rotation_degrees(Vec3::Z, 1.0));
        }

        let expected = initial * rotation_degrees(Vec3::Z, 30.0);
        assert!(node.local_transform().abs_diff_eq(expected, 1e-4));

        let decomposed = Transform::from_matrix(node.local_transform());
        assert!((decomposed.rotation_angle_degrees() - 30.0).abs() < 1e-3);
        // Rotating in the node's own frame leaves the offset untouched
        assert!((decomposed.position - Vec3::new(0.0, 0.0, -0.75)).length() < 1e-4);
    }

    #[test]
    fn test_children_drawn_in_insertion_order() {
        let log = Log::default();
        let mut root = Node::default();
        for id in ["a", "b", "c"] {
            let mut child = Node::default();
            child.add(recorder(id, &log));
            root.add(child);
        }
        root.add(recorder("root", &log));

        draw_root(&root);

        let order: Vec<_> = log.borrow().iter().map(|call| call.id).collect();
        assert_eq!(order, ["root", "a", "b", "c"]);
    }

    #[test]
    fn test_second_drawable_replaces_first() {
        let log = Log::default();
        let mut root = Node::default();
        root.add(recorder("first", &log));
        root.add(recorder("second", &log));

        draw_root(&root);

        let order: Vec<_> = log.borrow().iter().map(|call| call.id).collect();
        assert_eq!(order, ["second"]);
        assert_eq!(root.drawable_count(), 1);
    }

    #[test]
    fn test_boxed_dyn_drawable_attaches() {
        let log = Log::default();
        let drawable: Box<dyn Drawable> = recorder("dyn", &log);
        let mut root = Node::default();
        root.add(drawable);

        assert!(root.drawable().is_some());
        assert!(root.take_drawable().is_some());
        assert!(root.drawable().is_none());
    }

    #[test]
    fn test_paths_and_lookup() {
        let mut hand = Node::named("hand", translation(0.0, 0.0, -1.0));
        hand.add(Node::named("finger", Mat4::IDENTITY));
        let mut arm = Node::named("arm", translation(1.0, 0.0, 0.0));
        arm.add(hand);
        let mut root = Node::named("body", Mat4::IDENTITY);
        root.add(Node::named("head", Mat4::IDENTITY));
        root.add(arm);

        let finger = root.find("finger").expect("finger exists");
        assert_eq!(finger, NodePath::from([1, 0, 0]));
        assert_eq!(root.get(&finger).and_then(Node::name), Some("finger"));
        assert_eq!(root.find("body"), Some(NodePath::root()));
        assert!(root.find("tail").is_none());
        assert!(root.get(&NodePath::from([5])).is_none());

        assert_eq!(root.node_count(), 5);
        assert_eq!(root.depth(), 3);

        let world = root
            .world_transform_of(&finger, &Mat4::IDENTITY)
            .expect("valid path");
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 0.0, -1.0)).length() < EPSILON);
    }

    #[test]
    fn test_node_path_builders() {
        let path = NodePath::root().child(2).child(0);
        assert_eq!(path.indices(), &[2, 0]);
        assert_eq!(path.len(), 2);
        assert!(!path.is_empty());
        assert!(NodePath::root().is_empty());
        assert_eq!(NodePath::root().len(), 0);
    }
}
