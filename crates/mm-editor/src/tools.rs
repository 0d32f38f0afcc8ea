//! Pointer tool for canvas interactions.
//!
//! Translates pointer events into `EditorIntent`s that the session applies:
//!
//! | Gesture | Intent |
//! |---------|--------|
//! | Click on node | `Select(Some(id))` |
//! | Double-click on node | `Select(Some(id))`, `StartEdit` |
//! | Click on background | `Select(None)` |
//! | Drag a node | `MoveBy` (canvas units) |
//! | Drag the background | `Pan` (screen units) |
//! | Wheel | `Zoom` around the cursor |

use crate::commands::EditorIntent;
use crate::input::InputEvent;
use mm_core::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Drag {
    #[default]
    Idle,
    Node(NodeId),
    Canvas,
}

#[derive(Debug, Default)]
pub struct PointerTool {
    drag: Drag,
    last_x: f32,
    last_y: f32,
}

impl PointerTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node currently being dragged, if any.
    pub fn dragging(&self) -> Option<NodeId> {
        match self.drag {
            Drag::Node(id) => Some(id),
            _ => None,
        }
    }

    /// Handle an input event.
    ///
    /// `hit_node` is the node under the pointer (the session hit-tests
    /// before calling) and `scale` the current zoom, used to turn screen
    /// drag distances into canvas distances.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit_node: Option<NodeId>,
        scale: f32,
    ) -> Vec<EditorIntent> {
        match *event {
            InputEvent::PointerDown { x, y, clicks } => {
                self.last_x = x;
                self.last_y = y;
                match hit_node {
                    Some(id) => {
                        self.drag = Drag::Node(id);
                        if clicks >= 2 {
                            vec![EditorIntent::Select(Some(id)), EditorIntent::StartEdit]
                        } else {
                            vec![EditorIntent::Select(Some(id))]
                        }
                    }
                    None => {
                        self.drag = Drag::Canvas;
                        vec![EditorIntent::Select(None)]
                    }
                }
            }
            InputEvent::PointerMove { x, y } => {
                let dx = x - self.last_x;
                let dy = y - self.last_y;
                self.last_x = x;
                self.last_y = y;
                match self.drag {
                    Drag::Idle => vec![],
                    Drag::Node(id) => vec![EditorIntent::MoveBy {
                        id,
                        dx: dx / scale,
                        dy: dy / scale,
                    }],
                    Drag::Canvas => vec![EditorIntent::Pan { dx, dy }],
                }
            }
            InputEvent::PointerUp { .. } => {
                self.drag = Drag::Idle;
                vec![]
            }
            InputEvent::Wheel { x, y, delta } => vec![EditorIntent::Zoom {
                delta,
                center: Some((x, y)),
            }],
        }
    }
}
