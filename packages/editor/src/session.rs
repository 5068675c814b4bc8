//! # Edit Session
//!
//! Explicit application state of one editor: the open project (if any), its
//! history, the current slide, canvas interaction, clipboard and the last
//! user-visible error.
//!
//! Every committed user action goes through [`EditSession::commit`], which
//! pushes exactly one history entry. Actions that change nothing push
//! nothing. Async operations take `&mut self`, so a second request cannot
//! start while one is outstanding.

use std::collections::BTreeMap;

use arnika_model::{
    template, Element, ElementStyles, ElementType, IdGenerator, LayoutType, NavigationMetadata,
    Project, Slide, Template, ThemePatch, ThemePreset,
};
use tracing::{debug, info, warn};

use crate::errors::{EditorError, EditorResult};
use crate::geometry::{align, Alignment, ElementRect, Point};
use crate::history::History;
use crate::interaction::{ContextAction, Interaction, PointerInput, PointerOutcome};
use crate::links::LinkMap;
use crate::mutations::Mutation;
use crate::persistence::Restored;
use crate::pipeline::ImportPipeline;
use crate::services::{
    AspectRatio, ImageGenerator, SlideRefiner, SourceFile, StructureGenerator, TextExtractor,
};

/// Percentage points added to pasted and duplicated elements
pub const PASTE_OFFSET: f64 = 2.0;

/// Title of slides created with "Add"
pub const NEW_SLIDE_TITLE: &str = "New Story Slide";

/// Stacking order given to newly added elements
const NEW_ELEMENT_Z: i32 = 50;
const AI_IMAGE_Z: i32 = 60;

/// Single-user editing session
#[derive(Debug)]
pub struct EditSession {
    project: Option<Project>,
    history: History,
    current_slide_id: Option<String>,
    interaction: Interaction,
    clipboard: Vec<Element>,
    ids: IdGenerator,
    last_error: Option<String>,
}

impl EditSession {
    /// Empty session, no project open
    pub fn new() -> Self {
        Self::with_ids(IdGenerator::new())
    }

    pub fn with_ids(ids: IdGenerator) -> Self {
        Self {
            project: None,
            history: History::new(),
            current_slide_id: None,
            interaction: Interaction::new(),
            clipboard: Vec::new(),
            ids,
            last_error: None,
        }
    }

    /// Resume from persisted state. The first slide becomes current and the
    /// history keeps its stored cursor.
    pub fn from_restored(restored: Restored) -> Self {
        let mut session = Self::new();
        session.current_slide_id = restored
            .project
            .as_ref()
            .and_then(|p| p.first_slide_id())
            .map(str::to_string);
        session.history = restored.history;
        session.project = restored.project;
        session
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    pub fn clipboard(&self) -> &[Element] {
        &self.clipboard
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Current slide, falling back to the first one if the stored id went
    /// stale
    pub fn current_slide(&self) -> Option<&Slide> {
        let project = self.project.as_ref()?;
        self.current_slide_id
            .as_deref()
            .and_then(|id| project.slide(id))
            .or_else(|| project.slides.first().map(|s| s.as_ref()))
    }

    pub fn current_slide_id(&self) -> Option<&str> {
        self.current_slide().map(|s| s.id.as_str())
    }

    /// Make `slide_id` current. Unknown ids are ignored.
    pub fn select_slide(&mut self, slide_id: &str) -> bool {
        let exists = self
            .project
            .as_ref()
            .is_some_and(|p| p.slide(slide_id).is_some());
        if exists {
            self.current_slide_id = Some(slide_id.to_string());
            self.interaction.clear_selection();
        }
        exists
    }

    // ---- commit ----------------------------------------------------------

    /// Apply a mutation and record it under its default label
    pub fn commit(&mut self, mutation: Mutation) -> bool {
        let label = mutation.label();
        self.commit_as(mutation, label)
    }

    /// Apply a mutation and record it under `label`. Returns whether the
    /// project changed.
    pub fn commit_as(&mut self, mutation: Mutation, label: impl Into<String>) -> bool {
        let Some(current) = self.project.as_ref() else {
            debug!(?mutation, "no project open, ignoring");
            return false;
        };

        match mutation.apply(current) {
            None => {
                // Last slide deleted: the project dissolves, history stays
                info!("last slide deleted, closing project");
                self.project = None;
                self.current_slide_id = None;
                self.interaction.clear_selection();
                true
            }
            Some(next) if &next == current => {
                debug!(action = mutation.label(), "mutation changed nothing");
                false
            }
            Some(next) => {
                let label = label.into();
                debug!(action = %label, "committed");
                self.history.push(next.clone(), label);
                self.set_live(next);
                true
            }
        }
    }

    /// Replace the live project and repair dependent state
    fn set_live(&mut self, project: Project) {
        let current_exists = self
            .current_slide_id
            .as_deref()
            .is_some_and(|id| project.slide(id).is_some());
        if !current_exists {
            self.current_slide_id = project.first_slide_id().map(str::to_string);
        }

        if let Some(slide) = self
            .current_slide_id
            .as_deref()
            .and_then(|id| project.slide(id))
        {
            self.interaction.retain_existing(slide);
        }

        self.project = Some(project);
    }

    /// Open a new project and record it as the first step of its history
    fn open(&mut self, project: Project, label: String) {
        info!(name = %project.name, slides = project.slides.len(), "opened project");
        self.interaction.clear_selection();
        self.current_slide_id = project.first_slide_id().map(str::to_string);
        self.history.push(project.clone(), label);
        self.project = Some(project);
        self.last_error = None;
    }

    // ---- project lifecycle -----------------------------------------------

    pub fn new_from_template(&mut self, kind: Template) {
        self.open(template(kind), format!("New from {} template", kind));
    }

    /// Extract, generate and open a document. On failure the error is also
    /// kept as [`EditSession::last_error`] and the session is unchanged.
    pub async fn import<X, G>(
        &mut self,
        extractor: &X,
        generator: &G,
        file: &SourceFile,
    ) -> EditorResult<()>
    where
        X: TextExtractor,
        G: StructureGenerator,
    {
        self.last_error = None;
        let pipeline = ImportPipeline::new(extractor, generator);

        match pipeline.run(file, &mut self.ids).await {
            Ok(result) => {
                self.open(result.project, result.label);
                Ok(())
            }
            Err(e) => {
                warn!(file = %file.name, error = %e, "import failed");
                self.last_error = Some("AI analysis failed.".to_string());
                Err(e.into())
            }
        }
    }

    /// Drop the project and its history (the "reset cache" path)
    pub fn clear(&mut self) {
        info!("session cleared");
        self.project = None;
        self.history.clear();
        self.current_slide_id = None;
        self.interaction.clear_selection();
        self.clipboard.clear();
        self.last_error = None;
    }

    // ---- slides ----------------------------------------------------------

    /// Append a blank slide and make it current. Returns its id.
    pub fn add_slide(&mut self) -> Option<String> {
        let project = self.project.as_ref()?;
        let id = self.ids.next_unused("slide", project);
        let slide = Slide::new(id.clone(), NEW_SLIDE_TITLE, LayoutType::Blank);

        if !self.commit(Mutation::AddSlide { slide }) {
            return None;
        }
        self.select_slide(&id);
        Some(id)
    }

    pub fn delete_slide(&mut self, slide_id: &str) -> bool {
        self.commit(Mutation::DeleteSlide {
            slide_id: slide_id.to_string(),
        })
    }

    pub fn rename_slide(&mut self, slide_id: &str, title: &str) -> bool {
        self.commit(Mutation::UpdateSlideTitle {
            slide_id: slide_id.to_string(),
            title: title.to_string(),
        })
    }

    pub fn move_slide(&mut self, slide_id: &str, index: usize) -> bool {
        self.commit(Mutation::MoveSlide {
            slide_id: slide_id.to_string(),
            index,
        })
    }

    // ---- elements --------------------------------------------------------

    /// Add a new element of `kind` to the current slide at the default spot.
    /// Returns its id.
    pub fn add_element(&mut self, kind: ElementType, content: &str) -> Option<String> {
        let width = match kind {
            ElementType::Image | ElementType::Video | ElementType::Gif => "300px",
            _ => "auto",
        };
        let styles = ElementStyles {
            left: Some("40%".into()),
            top: Some("40%".into()),
            width: Some(width.into()),
            z_index: Some(NEW_ELEMENT_Z),
            ..Default::default()
        };
        self.insert_element(kind, content, styles, "el", "Add Element")
    }

    fn insert_element(
        &mut self,
        kind: ElementType,
        content: &str,
        styles: ElementStyles,
        prefix: &str,
        label: &str,
    ) -> Option<String> {
        let slide_id = self.current_slide_id()?.to_string();
        let project = self.project.as_ref()?;
        let id = self.ids.next_unused(prefix, project);
        let element = Element::new(id.clone(), kind, content).with_styles(styles);

        self.commit_as(Mutation::AddElement { slide_id, element }, label)
            .then_some(id)
    }

    pub fn delete_element(&mut self, element_id: &str) -> bool {
        self.delete_elements(vec![element_id.to_string()])
    }

    fn delete_elements(&mut self, element_ids: Vec<String>) -> bool {
        let Some(slide_id) = self.current_slide_id().map(str::to_string) else {
            return false;
        };
        let changed = self.commit(Mutation::DeleteElements {
            slide_id,
            element_ids,
        });
        if changed {
            self.interaction.clear_selection();
        }
        changed
    }

    /// Shallow-merge styles into an element of the current slide
    pub fn update_element_styles(&mut self, element_id: &str, styles: ElementStyles) -> bool {
        let Some(slide_id) = self.current_slide_id().map(str::to_string) else {
            return false;
        };
        self.commit(Mutation::UpdateElementStyles {
            slide_id,
            element_id: element_id.to_string(),
            styles,
        })
    }

    pub fn update_element_metadata(
        &mut self,
        element_id: &str,
        metadata: NavigationMetadata,
    ) -> bool {
        let Some(slide_id) = self.current_slide_id().map(str::to_string) else {
            return false;
        };
        self.commit(Mutation::UpdateElementMetadata {
            slide_id,
            element_id: element_id.to_string(),
            metadata,
        })
    }

    pub fn update_element_content(&mut self, element_id: &str, content: &str) -> bool {
        let Some(slide_id) = self.current_slide_id().map(str::to_string) else {
            return false;
        };
        self.commit(Mutation::UpdateElementContent {
            slide_id,
            element_id: element_id.to_string(),
            content: content.to_string(),
        })
    }

    /// Flip the `hidden` flag of an element (layer panel eye icon)
    pub fn toggle_visibility(&mut self, element_id: &str) -> bool {
        let Some(hidden) = self
            .current_slide()
            .and_then(|s| s.element(element_id))
            .map(Element::is_hidden)
        else {
            return false;
        };

        self.update_element_styles(
            element_id,
            ElementStyles {
                hidden: Some(!hidden),
                ..Default::default()
            },
        )
    }

    // ---- theme -----------------------------------------------------------

    pub fn apply_theme(&mut self, theme: ThemePatch) -> bool {
        self.commit(Mutation::ApplyTheme { theme })
    }

    pub fn apply_theme_preset(&mut self, preset: &ThemePreset) -> bool {
        self.commit_as(
            Mutation::ApplyTheme {
                theme: preset.patch(),
            },
            format!("Applied {} Theme", preset.name),
        )
    }

    // ---- alignment -------------------------------------------------------

    /// Align the selected elements of the current slide. No-op with too few
    /// selected.
    pub fn align(&mut self, alignment: Alignment) -> bool {
        let Some(slide) = self.current_slide() else {
            return false;
        };

        let rects: Vec<ElementRect> = self
            .interaction
            .selection()
            .iter()
            .filter_map(|id| slide.element(id))
            .map(ElementRect::of)
            .collect();

        let updates = align(&rects, alignment);
        if updates.is_empty() {
            debug!(%alignment, selected = rects.len(), "not enough elements to align");
            return false;
        }

        let slide_id = slide.id.clone();
        self.commit(Mutation::AlignElements { slide_id, updates })
    }

    // ---- pointer & gestures ----------------------------------------------

    /// Pointer-down on an element (or empty canvas with `None`). Internal
    /// links switch the current slide here; external ones are returned for
    /// the host to open.
    pub fn pointer_down(&mut self, target: Option<&str>, input: PointerInput) -> PointerOutcome {
        let Some(slide) = self.current_slide().cloned() else {
            return PointerOutcome::Ignored;
        };

        let outcome = self.interaction.pointer_down(&slide, target, input);
        if let PointerOutcome::Navigate(NavigationMetadata::Internal(target_id)) = &outcome {
            if !self.navigate_to(target_id) {
                debug!(target = %target_id, "link points at a missing slide");
            }
        }
        outcome
    }

    /// Follow an internal link. Broken links do nothing.
    pub fn navigate_to(&mut self, slide_id: &str) -> bool {
        let exists = self
            .project
            .as_ref()
            .is_some_and(|p| p.slide(slide_id).is_some());
        if exists {
            self.current_slide_id = Some(slide_id.to_string());
            if !self.interaction.is_presenting() {
                self.interaction.clear_selection();
            }
        }
        exists
    }

    pub fn pointer_move(&mut self, position: Point) -> Option<&BTreeMap<String, ElementStyles>> {
        self.interaction.pointer_move(position)
    }

    /// Release: commits the drag as one "Move Elements" entry
    pub fn pointer_up(&mut self) -> bool {
        let positions = self.interaction.pointer_up();
        self.commit_positions(positions)
    }

    pub fn touch_move(&mut self, touches: &[Point]) -> Option<&BTreeMap<String, ElementStyles>> {
        self.interaction.touch_move(touches)
    }

    pub fn touch_end(&mut self, remaining: usize) -> bool {
        let positions = self.interaction.touch_end(remaining);
        self.commit_positions(positions)
    }

    fn commit_positions(&mut self, positions: Option<BTreeMap<String, ElementStyles>>) -> bool {
        let (Some(positions), Some(slide_id)) =
            (positions, self.current_slide_id().map(str::to_string))
        else {
            return false;
        };
        self.commit(Mutation::MoveElements {
            slide_id,
            positions,
        })
    }

    /// Wheel over the canvas. Zooms only with the modifier held.
    pub fn wheel(&mut self, delta_y: f64, modifier: bool) -> bool {
        self.interaction.wheel(delta_y, modifier)
    }

    pub fn zoom_in(&mut self) {
        self.interaction.zoom_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.interaction.zoom_mut().zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.interaction.zoom_mut().reset();
    }

    /// Refit the canvas to a resized container
    pub fn fit(&mut self, container_width: f64, container_height: f64) {
        let presenting = self.interaction.is_presenting();
        self.interaction
            .zoom_mut()
            .fit(container_width, container_height, presenting);
    }

    pub fn set_presenting(&mut self, presenting: bool) {
        info!(presenting, "presentation mode");
        self.interaction.set_presenting(presenting);
    }

    // ---- context menu & clipboard ----------------------------------------

    /// Open the context menu and list its actions
    pub fn open_context_menu(&mut self, position: Point, target: Option<&str>) -> Vec<ContextAction> {
        self.interaction.open_context_menu(position, target).actions()
    }

    /// Run a context action on the current selection
    pub fn context_action(&mut self, action: ContextAction) -> bool {
        self.interaction.close_context_menu();
        let Some(slide) = self.current_slide().cloned() else {
            return false;
        };
        let selected: Vec<String> = self
            .interaction
            .selection()
            .iter()
            .filter(|id| slide.contains_element(id))
            .cloned()
            .collect();

        debug!(%action, selected = selected.len(), "context action");

        match action {
            ContextAction::Copy => {
                self.copy_to_clipboard(&slide, &selected);
                false
            }
            ContextAction::Cut => {
                if selected.is_empty() {
                    return false;
                }
                self.copy_to_clipboard(&slide, &selected);
                let changed = self.commit_as(
                    Mutation::DeleteElements {
                        slide_id: slide.id.clone(),
                        element_ids: selected,
                    },
                    "Cut",
                );
                self.interaction.clear_selection();
                changed
            }
            ContextAction::Paste => {
                let sources = self.clipboard.clone();
                self.insert_copies(&slide.id, sources, "Paste")
            }
            ContextAction::Duplicate => {
                let sources = selected
                    .iter()
                    .filter_map(|id| slide.element(id))
                    .cloned()
                    .collect();
                self.insert_copies(&slide.id, sources, "Duplicate")
            }
            ContextAction::BringToFront | ContextAction::SendToBack => {
                self.restack(&slide, &selected, action == ContextAction::BringToFront)
            }
            ContextAction::Group => {
                if selected.len() < 2 {
                    return false;
                }
                let group_id = self.ids.next_id("group");
                self.commit(Mutation::SetElementsGroup {
                    slide_id: slide.id.clone(),
                    element_ids: selected,
                    group_id: Some(group_id),
                })
            }
            ContextAction::Ungroup => {
                // Ungrouping one member releases its whole group
                let groups: Vec<&str> = selected
                    .iter()
                    .filter_map(|id| slide.element(id)?.group_id.as_deref())
                    .collect();
                let members: Vec<String> = slide
                    .elements
                    .iter()
                    .filter(|e| e.group_id.as_deref().is_some_and(|g| groups.contains(&g)))
                    .map(|e| e.id.clone())
                    .collect();
                if members.is_empty() {
                    return false;
                }
                self.commit(Mutation::SetElementsGroup {
                    slide_id: slide.id.clone(),
                    element_ids: members,
                    group_id: None,
                })
            }
            ContextAction::Delete => {
                if selected.is_empty() {
                    return false;
                }
                self.delete_elements(selected)
            }
        }
    }

    fn copy_to_clipboard(&mut self, slide: &Slide, ids: &[String]) {
        let copied: Vec<Element> = ids.iter().filter_map(|id| slide.element(id)).cloned().collect();
        if !copied.is_empty() {
            self.clipboard = copied;
        }
    }

    /// Insert copies of `sources` with fresh ids, nudged by [`PASTE_OFFSET`],
    /// and select them
    fn insert_copies(&mut self, slide_id: &str, sources: Vec<Element>, label: &str) -> bool {
        let Some(project) = self.project.as_ref() else {
            return false;
        };
        if sources.is_empty() {
            return false;
        }

        let mut copies = Vec::with_capacity(sources.len());
        for source in sources {
            let mut copy = source;
            copy.id = self.ids.next_unused("el", project);
            copy.group_id = None;

            let left = arnika_model::parse_length(copy.left(), 0.0) + PASTE_OFFSET;
            let top = arnika_model::parse_length(copy.top(), 0.0) + PASTE_OFFSET;
            copy.apply_styles(&ElementStyles::position(
                arnika_model::format_percent(left),
                arnika_model::format_percent(top),
            ));
            copies.push(copy);
        }

        let new_ids: Vec<String> = copies.iter().map(|e| e.id.clone()).collect();
        let changed = self.commit_as(
            Mutation::AddElements {
                slide_id: slide_id.to_string(),
                elements: copies,
            },
            label,
        );
        if changed {
            self.interaction.select_many(new_ids);
        }
        changed
    }

    fn restack(&mut self, slide: &Slide, ids: &[String], to_front: bool) -> bool {
        if ids.is_empty() {
            return false;
        }

        let styles: BTreeMap<String, ElementStyles> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let z = if to_front {
                    slide.max_z_index().unwrap_or(0) + 1 + i as i32
                } else {
                    slide.min_z_index().unwrap_or(0) - ids.len() as i32 + i as i32
                };
                (
                    id.clone(),
                    ElementStyles {
                        z_index: Some(z),
                        ..Default::default()
                    },
                )
            })
            .collect();

        let label = if to_front { "Bring to Front" } else { "Send to Back" };
        self.commit_as(
            Mutation::UpdateElementsStyles {
                slide_id: slide.id.clone(),
                styles,
            },
            label,
        )
    }

    // ---- history ---------------------------------------------------------

    /// Step back one entry. With the project closed (last slide deleted)
    /// this reopens the entry under the cursor instead.
    pub fn undo(&mut self) -> bool {
        let previous = if self.project.is_none() {
            self.history.current().map(|entry| entry.project.clone())
        } else {
            self.history.undo().cloned()
        };
        let Some(project) = previous else {
            return false;
        };
        debug!(cursor = ?self.history.cursor(), "undo");
        self.set_live(project);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(project) = self.history.redo().cloned() else {
            return false;
        };
        debug!(cursor = ?self.history.cursor(), "redo");
        self.set_live(project);
        true
    }

    /// Jump to a history entry without truncating later ones
    pub fn restore(&mut self, index: usize) -> bool {
        let Some(project) = self.history.restore(index).cloned() else {
            return false;
        };
        info!(index, "restored history point");
        self.set_live(project);
        true
    }

    // ---- generative services ---------------------------------------------

    /// Redesign the current slide. The refiner must keep the slide id.
    pub async fn refine_current_slide<R: SlideRefiner>(&mut self, refiner: &R) -> EditorResult<()> {
        let (slide, primary) = {
            let project = self.project.as_ref().ok_or(EditorError::NoProject)?;
            let slide = self.current_slide().ok_or(EditorError::NoProject)?.clone();
            (slide, project.theme.primary_color.clone())
        };
        self.last_error = None;

        let refined = match refiner.refine(&slide, &primary).await {
            Ok(refined) => refined,
            Err(e) => {
                warn!(slide = %slide.id, error = %e, "refinement failed");
                self.last_error = Some(format!("Refinement failed: {}", e));
                return Err(e.into());
            }
        };

        if refined.id != slide.id {
            self.last_error = Some("Refinement returned a different slide.".to_string());
            return Err(EditorError::SlideIdChanged {
                expected: slide.id,
                returned: refined.id,
            });
        }

        self.commit(Mutation::ReplaceSlide { slide: refined });
        Ok(())
    }

    /// Generate an image and place it on the current slide at 30 % / 30 %.
    /// Returns the new element id.
    pub async fn generate_image<G: ImageGenerator>(
        &mut self,
        generator: &G,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> EditorResult<String> {
        if self.project.is_none() {
            return Err(EditorError::NoProject);
        }
        self.last_error = None;

        let url = match generator.generate_image(prompt, aspect_ratio).await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "image generation failed");
                self.last_error = Some(format!("Image generation failed: {}", e));
                return Err(e.into());
            }
        };

        let styles = ElementStyles {
            left: Some("30%".into()),
            top: Some("30%".into()),
            width: Some("400px".into()),
            z_index: Some(AI_IMAGE_Z),
            border_radius: Some("24px".into()),
            box_shadow: Some("0 20px 40px rgba(0,0,0,0.1)".into()),
            ..Default::default()
        };
        self.insert_element(ElementType::Image, &url, styles, "ai-img", "Generate AI Image")
            .ok_or(EditorError::NoProject)
    }

    pub fn link_map(&self) -> Option<LinkMap> {
        self.project.as_ref().map(LinkMap::build)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}
