//! In-memory implementation of [`NoteStore`] and [`BlobStore`].
//!
//! Intended for tests and the replay host. Nothing is persisted across
//! restarts. Notebooks can be seeded from the same JSON shape that
//! `fetch_notebook` returns.

use crate::bounds::compute_bounds;
use crate::config::CanvasConfig;
use crate::error::{StoreError, StoreResult};
use crate::graph::ConnectionGraph;
use crate::id::{ConnectionId, NoteId, NotebookId};
use crate::layout::{Band, place_new_note};
use crate::model::{
    Connection, Note, NoteKind, NotePatch, Notebook, NotebookSnapshot, NotebookSummary, Side,
};
use crate::store::{BlobStore, NoteStore};
use kurbo::Point;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    config: CanvasConfig,
    /// Notebooks in insertion order.
    notebooks: Vec<Notebook>,
    /// Which notebook owns each note.
    owners: HashMap<NoteId, NotebookId>,
    connections: ConnectionGraph,
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Seed a notebook (and its connections) as if it had been fetched.
    pub fn insert_snapshot(&mut self, snapshot: NotebookSnapshot) {
        let NotebookSnapshot {
            notebook,
            connections,
        } = snapshot;
        for note in &notebook.notes {
            self.owners.insert(note.id, notebook.id);
        }
        self.notebooks.retain(|nb| nb.id != notebook.id);
        self.notebooks.push(notebook);
        for conn in connections {
            let id = conn.id;
            if let Err(err) = self.connections.insert(conn) {
                log::warn!("seed connection {id} rejected: {err}");
            }
        }
    }

    /// Seed from a JSON array of notebook snapshots.
    pub fn load_json(&mut self, json: &str) -> StoreResult<Vec<NotebookId>> {
        let snapshots: Vec<NotebookSnapshot> =
            serde_json::from_str(json).map_err(|e| StoreError::Invalid(e.to_string()))?;
        let ids = snapshots.iter().map(|s| s.notebook.id).collect();
        for snapshot in snapshots {
            self.insert_snapshot(snapshot);
        }
        Ok(ids)
    }

    /// Raw bytes of an uploaded image.
    pub fn blob(&self, url: &str) -> Option<&[u8]> {
        self.blobs.get(url).map(Vec::as_slice)
    }

    fn notebook(&self, id: NotebookId) -> StoreResult<&Notebook> {
        self.notebooks
            .iter()
            .find(|nb| nb.id == id)
            .ok_or_else(|| StoreError::not_found("notebook", id))
    }

    fn notebook_mut(&mut self, id: NotebookId) -> StoreResult<&mut Notebook> {
        self.notebooks
            .iter_mut()
            .find(|nb| nb.id == id)
            .ok_or_else(|| StoreError::not_found("notebook", id))
    }

    fn owner(&self, note: NoteId) -> StoreResult<NotebookId> {
        self.owners
            .get(&note)
            .copied()
            .ok_or_else(|| StoreError::not_found("note", note))
    }
}

impl NoteStore for MemoryStore {
    fn list_notebooks(&self) -> StoreResult<Vec<NotebookSummary>> {
        let mut list: Vec<NotebookSummary> = self
            .notebooks
            .iter()
            .map(|nb| NotebookSummary {
                id: nb.id,
                name: nb.name.clone(),
                subtitle: nb.subtitle.clone(),
                note_count: nb.notes.len(),
                created_at: nb.created_at,
            })
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    fn create_notebook(
        &mut self,
        name: &str,
        subtitle: Option<&str>,
        cover_image: Option<&str>,
    ) -> StoreResult<Notebook> {
        if name.trim().is_empty() {
            return Err(StoreError::Invalid("name is required".into()));
        }
        let mut notebook = Notebook::new(NotebookId::generate(), name);
        notebook.subtitle = subtitle.map(str::to_owned);
        notebook.cover_image = cover_image.map(str::to_owned);
        self.notebooks.push(notebook.clone());
        Ok(notebook)
    }

    fn fetch_notebook(&self, id: NotebookId) -> StoreResult<NotebookSnapshot> {
        let notebook = self.notebook(id)?.clone();
        let connections = self
            .connections
            .for_notebook(&notebook)
            .into_iter()
            .cloned()
            .collect();
        Ok(NotebookSnapshot {
            notebook,
            connections,
        })
    }

    fn delete_notebook(&mut self, id: NotebookId) -> StoreResult<()> {
        let pos = self
            .notebooks
            .iter()
            .position(|nb| nb.id == id)
            .ok_or_else(|| StoreError::not_found("notebook", id))?;
        let notebook = self.notebooks.remove(pos);
        for note in &notebook.notes {
            self.owners.remove(&note.id);
            self.connections.remove_note(note.id);
        }
        log::info!("deleted notebook {id} with {} notes", notebook.notes.len());
        Ok(())
    }

    fn create_note(
        &mut self,
        notebook: NotebookId,
        kind: NoteKind,
        content: &str,
        position: Option<Point>,
    ) -> StoreResult<Note> {
        if content.trim().is_empty() {
            return Err(StoreError::Invalid("content is required".into()));
        }
        let cfg = self.config;
        let nb = self.notebook_mut(notebook)?;
        let at = position.unwrap_or_else(|| {
            let height = compute_bounds(&nb.notes, &cfg).height;
            place_new_note(&nb.notes, Band::for_canvas_height(height, &cfg), &cfg)
        });
        let note = Note::new(NoteId::generate(), kind, content, at.x.max(0.0), at.y.max(0.0))
            .with_size(cfg.default_note_width, cfg.default_note_height);
        nb.push_note(note.clone());
        self.owners.insert(note.id, notebook);
        Ok(note)
    }

    fn update_note(&mut self, id: NoteId, patch: &NotePatch) -> StoreResult<Note> {
        let owner = self.owner(id)?;
        let cfg = self.config;
        let note = self
            .notebook_mut(owner)?
            .note_mut(id)
            .ok_or_else(|| StoreError::not_found("note", id))?;
        note.apply_patch(patch, &cfg);
        Ok(note.clone())
    }

    fn delete_note(&mut self, id: NoteId) -> StoreResult<()> {
        let owner = self.owner(id)?;
        self.notebook_mut(owner)?.remove_note(id);
        self.owners.remove(&id);
        self.connections.remove_note(id);
        Ok(())
    }

    fn create_connection(
        &mut self,
        notebook: NotebookId,
        from: NoteId,
        to: NoteId,
        from_side: Side,
        to_side: Side,
    ) -> StoreResult<Connection> {
        self.notebook(notebook)?;
        self.owner(from)?;
        self.owner(to)?;
        Ok(self.connections.create(from, to, from_side, to_side)?)
    }

    fn delete_connection(&mut self, id: ConnectionId) -> StoreResult<()> {
        self.connections.delete(id);
        Ok(())
    }
}

impl BlobStore for MemoryStore {
    fn upload_image(&mut self, bytes: &[u8], mime: &str) -> StoreResult<String> {
        let Some(ext) = mime.strip_prefix("image/") else {
            return Err(StoreError::Upload(format!("not an image: {mime}")));
        };
        if bytes.is_empty() {
            return Err(StoreError::Upload("empty image".into()));
        }
        let ext = if ext.is_empty() { "png" } else { ext };
        let url = format!("memory://screenshots/{}.{ext}", self.blobs.len());
        self.blobs.insert(url.clone(), bytes.to_vec());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectionError;

    fn store_with_notebook() -> (MemoryStore, NotebookId) {
        let mut store = MemoryStore::new(CanvasConfig::default());
        let nb = store.create_notebook("Research", None, None).unwrap();
        (store, nb.id)
    }

    #[test]
    fn create_note_without_position_uses_planner() {
        let (mut store, nb) = store_with_notebook();
        let first = store.create_note(nb, NoteKind::Text, "one", None).unwrap();
        assert_eq!(first.origin(), Point::new(100.0, 300.0));
        // The first note grew the canvas to 800, so the band moved down.
        let second = store.create_note(nb, NoteKind::Text, "two", None).unwrap();
        assert_eq!(second.origin(), Point::new(100.0, 500.0));
    }

    #[test]
    fn empty_content_is_invalid() {
        let (mut store, nb) = store_with_notebook();
        let err = store.create_note(nb, NoteKind::Text, "   ", None).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn duplicate_connection_is_rejected() {
        let (mut store, nb) = store_with_notebook();
        let a = store.create_note(nb, NoteKind::Text, "a", Some(Point::ZERO)).unwrap();
        let b = store.create_note(nb, NoteKind::Text, "b", Some(Point::new(500.0, 0.0))).unwrap();
        store.create_connection(nb, a.id, b.id, Side::Right, Side::Left).unwrap();
        let err = store
            .create_connection(nb, a.id, b.id, Side::Right, Side::Left)
            .unwrap_err();
        assert_eq!(err, StoreError::Connection(ConnectionError::DuplicateEdge));
        assert_eq!(store.fetch_notebook(nb).unwrap().connections.len(), 1);
    }

    #[test]
    fn delete_notebook_cascades() {
        let (mut store, nb) = store_with_notebook();
        let a = store.create_note(nb, NoteKind::Text, "a", Some(Point::ZERO)).unwrap();
        let b = store.create_note(nb, NoteKind::Text, "b", Some(Point::new(500.0, 0.0))).unwrap();
        let conn = store.create_connection(nb, a.id, b.id, Side::Right, Side::Left).unwrap();
        store.delete_notebook(nb).unwrap();

        assert!(store.fetch_notebook(nb).unwrap_err().is_not_found());
        assert!(store.update_note(a.id, &NotePatch::position(1.0, 1.0)).is_err());
        assert!(store.connections.get(conn.id).is_none());
        store.delete_connection(conn.id).unwrap();
    }

    #[test]
    fn upload_rejects_non_images() {
        let (mut store, _) = store_with_notebook();
        assert!(store.upload_image(b"hello", "text/plain").is_err());
        let url = store.upload_image(&[1, 2, 3], "image/png").unwrap();
        assert!(url.ends_with(".png"));
        assert_eq!(store.blob(&url), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn minted_ids_skip_ids_already_in_use() {
        let next: u64 = NoteId::generate()
            .as_str()
            .trim_start_matches("note_")
            .parse()
            .unwrap();
        let seeded: Vec<NoteId> = (next + 1..=next + 32)
            .map(|k| NoteId::intern(&format!("note_{k}")))
            .collect();
        let mut notebook = Notebook::new(NotebookId::intern("ms_seeded"), "Seeded");
        for (i, id) in seeded.iter().enumerate() {
            notebook.push_note(Note::new(*id, NoteKind::Text, "seeded", 0.0, i as f64 * 200.0));
        }
        let connections: Vec<Connection> = seeded[1..]
            .iter()
            .map(|to| (seeded[0], *to))
            .chain([(seeded[1], seeded[0])])
            .zip(next + 1..=next + 32)
            .map(|((from, to), k)| Connection {
                id: ConnectionId::intern(&format!("conn_{k}")),
                from_note_id: from,
                to_note_id: to,
                from_side: Side::Right,
                to_side: Side::Left,
            })
            .collect();

        let mut store = MemoryStore::new(CanvasConfig::default());
        let nb = notebook.id;
        store.insert_snapshot(NotebookSnapshot {
            notebook,
            connections,
        });
        assert_eq!(store.fetch_notebook(nb).unwrap().connections.len(), 32);

        let created = store.create_note(nb, NoteKind::Text, "fresh", None).unwrap();
        assert!(!seeded.contains(&created.id));
        let fetched = store.fetch_notebook(nb).unwrap();
        assert_eq!(fetched.notebook.notes.len(), 33);
        assert_eq!(
            fetched.notebook.notes.iter().filter(|n| n.id == created.id).count(),
            1
        );

        store
            .create_connection(nb, created.id, seeded[0], Side::Bottom, Side::Top)
            .unwrap();
        assert_eq!(store.fetch_notebook(nb).unwrap().connections.len(), 33);
    }
}
