//! Recursive traversal of containers
//!
//! Swift exposes a flat, listing based API. [`walk`] turns it into a tree:
//! every path is resolved with `stat`, containers are listed and their
//! children walked in listing order, objects are handed to a [`Visitor`].
//!
//! The traversal uses an explicit stack of frames instead of recursion.
//! The first error stops the walk; work already done is not undone.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::item::StorageItem;
use crate::path::{PathReference, check_segments, join_path};
use crate::traits::ObjectStore;

/// Callbacks invoked by [`walk`]
#[async_trait]
pub trait Visitor: Send {
    /// Called for every object reached by the walk
    async fn visit_object(&mut self, path: &str) -> Result<()>;

    /// Called after every child of a container has been visited
    async fn leave_container(&mut self, _path: &str) -> Result<()> {
        Ok(())
    }
}

enum Frame {
    Enter(String),
    Leave(String),
}

/// Walk `target`, calling `visitor` for each object and emptied container
///
/// - `Root` lists the containers and walks each one.
/// - `Children(base)` walks every child of `base` but not `base` itself.
/// - `Container` and `Object` are resolved and walked directly.
pub async fn walk<S, V>(store: &S, target: &PathReference, visitor: &mut V) -> Result<()>
where
    S: ObjectStore + ?Sized,
    V: Visitor + ?Sized,
{
    let mut stack = match target {
        PathReference::Root => children(store, "").await?,
        PathReference::Children(base) => {
            let item = store.stat(base).await?;
            if !item.is_container() {
                return Err(Error::InvalidPath(format!(
                    "{target} does not name a container"
                )));
            }
            children(store, base).await?
        }
        other => vec![Frame::Enter(other.as_path())],
    };

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(path) => match store.stat(&path).await? {
                StorageItem::Container(_) => {
                    tracing::debug!(path = %path, "Entering container");
                    let nested = children(store, &path).await?;
                    stack.push(Frame::Leave(path));
                    stack.extend(nested);
                }
                StorageItem::Object(_) => visitor.visit_object(&path).await?,
            },
            Frame::Leave(path) => visitor.leave_container(&path).await?,
        }
    }

    Ok(())
}

/// Enter frames for the children of `parent`, reversed so that popping the
/// stack yields listing order
///
/// A listing entry with a `.` or `..` segment would address something
/// outside `parent` and fails the walk before anything is visited.
async fn children<S>(store: &S, parent: &str) -> Result<Vec<Frame>>
where
    S: ObjectStore + ?Sized,
{
    let names = store.list(parent).await?;
    let mut frames = Vec::with_capacity(names.len());
    for name in names.iter().rev() {
        check_segments(name).map_err(|_| {
            Error::InvalidPath(format!("listing of '{parent}' contains unsafe name '{name}'"))
        })?;
        frames.push(Frame::Enter(join_path(parent, name)));
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ContainerInfo, ObjectInfo};
    use crate::traits::MockObjectStore;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl Visitor for Recorder {
        async fn visit_object(&mut self, path: &str) -> Result<()> {
            if self.fail_on == Some(path) {
                return Err(Error::Server {
                    status: 500,
                    message: "Boom".into(),
                });
            }
            self.events.push(format!("object {path}"));
            Ok(())
        }

        async fn leave_container(&mut self, path: &str) -> Result<()> {
            self.events.push(format!("leave {path}"));
            Ok(())
        }
    }

    struct ObjectsOnly(Vec<String>);

    #[async_trait]
    impl Visitor for ObjectsOnly {
        async fn visit_object(&mut self, path: &str) -> Result<()> {
            self.0.push(path.to_string());
            Ok(())
        }
    }

    fn container(name: &str) -> StorageItem {
        StorageItem::Container(ContainerInfo {
            name: name.to_string(),
            ..Default::default()
        })
    }

    fn object(name: &str) -> StorageItem {
        StorageItem::Object(ObjectInfo {
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// Store with this layout:
    ///
    /// ```text
    /// c/
    ///   a.txt
    ///   sub/
    ///     b.txt
    /// d/
    ///   e.txt
    /// ```
    fn sample_store() -> MockObjectStore {
        let mut store = MockObjectStore::new();
        store.expect_stat().returning(|path| match path {
            "c" | "c/sub" | "d" => Ok(container(path)),
            "c/a.txt" | "c/sub/b.txt" | "d/e.txt" => Ok(object(path)),
            other => Err(Error::NotFound(other.to_string())),
        });
        store.expect_list().returning(|path| match path {
            "" => Ok(vec!["c".into(), "d".into()]),
            "c" => Ok(vec!["a.txt".into(), "sub".into()]),
            "c/sub" => Ok(vec!["b.txt".into()]),
            "d" => Ok(vec!["e.txt".into()]),
            other => Err(Error::NotFound(other.to_string())),
        });
        store
    }

    #[tokio::test]
    async fn test_walk_visits_leaves_in_listing_order() {
        let store = sample_store();
        let mut visitor = ObjectsOnly(Vec::new());

        walk(&store, &PathReference::Container("c".into()), &mut visitor)
            .await
            .unwrap();

        assert_eq!(visitor.0, vec!["c/a.txt", "c/sub/b.txt"]);
    }

    #[tokio::test]
    async fn test_walk_leaves_containers_post_order() {
        let store = sample_store();
        let mut visitor = Recorder::default();

        walk(&store, &PathReference::Container("c".into()), &mut visitor)
            .await
            .unwrap();

        assert_eq!(
            visitor.events,
            vec!["object c/a.txt", "object c/sub/b.txt", "leave c/sub", "leave c"]
        );
    }

    #[tokio::test]
    async fn test_walk_single_object() {
        let mut store = MockObjectStore::new();
        store
            .expect_stat()
            .withf(|path| path == "c/a.txt")
            .times(1)
            .returning(|path| Ok(object(path)));
        store.expect_list().times(0);

        let mut visitor = Recorder::default();
        let target = PathReference::parse("c/a.txt").unwrap();
        walk(&store, &target, &mut visitor).await.unwrap();

        assert_eq!(visitor.events, vec!["object c/a.txt"]);
    }

    #[tokio::test]
    async fn test_walk_root_does_not_leave_root() {
        let store = sample_store();
        let mut visitor = Recorder::default();

        walk(&store, &PathReference::Root, &mut visitor).await.unwrap();

        assert_eq!(
            visitor.events,
            vec![
                "object c/a.txt",
                "object c/sub/b.txt",
                "leave c/sub",
                "leave c",
                "object d/e.txt",
                "leave d",
            ]
        );
    }

    #[tokio::test]
    async fn test_walk_children_skips_base() {
        let store = sample_store();
        let mut visitor = Recorder::default();

        walk(&store, &PathReference::Children("c".into()), &mut visitor)
            .await
            .unwrap();

        assert_eq!(
            visitor.events,
            vec!["object c/a.txt", "object c/sub/b.txt", "leave c/sub"]
        );
    }

    #[tokio::test]
    async fn test_walk_refuses_dot_segment_listing_entry() {
        let mut store = MockObjectStore::new();
        store
            .expect_stat()
            .withf(|path| path == "c")
            .times(1)
            .returning(|path| Ok(container(path)));
        store
            .expect_list()
            .returning(|_| Ok(vec!["a.txt".into(), "../other".into()]));

        let mut visitor = Recorder::default();
        let result = walk(&store, &PathReference::Container("c".into()), &mut visitor).await;

        assert!(matches!(result, Err(Error::InvalidPath(_))));
        assert!(visitor.events.is_empty());
    }

    #[tokio::test]
    async fn test_walk_root_refuses_dot_container_name() {
        let mut store = MockObjectStore::new();
        store.expect_stat().times(0);
        store.expect_list().returning(|_| Ok(vec!["..".into()]));

        let mut visitor = Recorder::default();
        let result = walk(&store, &PathReference::Root, &mut visitor).await;

        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_walk_children_of_object_is_invalid() {
        let store = sample_store();
        let mut visitor = Recorder::default();

        let result = walk(
            &store,
            &PathReference::Children("c/a.txt".into()),
            &mut visitor,
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidPath(_))));
        assert!(visitor.events.is_empty());
    }

    #[tokio::test]
    async fn test_walk_stops_at_first_visitor_error() {
        let store = sample_store();
        let mut visitor = Recorder {
            fail_on: Some("c/a.txt"),
            ..Default::default()
        };

        let result = walk(&store, &PathReference::Root, &mut visitor).await;

        assert!(matches!(result, Err(Error::Server { status: 500, .. })));
        assert!(visitor.events.is_empty());
    }

    #[tokio::test]
    async fn test_walk_propagates_resolve_error_and_keeps_completed_work() {
        let mut store = MockObjectStore::new();
        store.expect_stat().returning(|path| match path {
            "c" => Ok(container(path)),
            "c/a.txt" => Ok(object(path)),
            other => Err(Error::NotFound(other.to_string())),
        });
        store
            .expect_list()
            .returning(|_| Ok(vec!["a.txt".into(), "gone.txt".into(), "z.txt".into()]));

        let mut visitor = Recorder::default();
        let result = walk(&store, &PathReference::Container("c".into()), &mut visitor).await;

        assert!(matches!(result, Err(Error::NotFound(ref p)) if p == "c/gone.txt"));
        assert_eq!(visitor.events, vec!["object c/a.txt"]);
    }

    #[tokio::test]
    async fn test_walk_propagates_list_error() {
        let mut store = MockObjectStore::new();
        store.expect_stat().returning(|path| Ok(container(path)));
        store.expect_list().times(1).returning(|_| {
            Err(Error::Server {
                status: 503,
                message: "Service Unavailable".into(),
            })
        });

        let mut visitor = Recorder::default();
        let result = walk(&store, &PathReference::Container("c".into()), &mut visitor).await;

        assert!(matches!(result, Err(Error::Server { status: 503, .. })));
        assert!(visitor.events.is_empty());
    }

    #[tokio::test]
    async fn test_walk_empty_container() {
        let mut store = MockObjectStore::new();
        store.expect_stat().returning(|path| Ok(container(path)));
        store.expect_list().returning(|_| Ok(Vec::new()));

        let mut visitor = Recorder::default();
        walk(&store, &PathReference::Container("empty".into()), &mut visitor)
            .await
            .unwrap();

        assert_eq!(visitor.events, vec!["leave empty"]);
    }
}
