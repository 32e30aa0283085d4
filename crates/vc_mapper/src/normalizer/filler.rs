use crate::context::{
    ArgumentContext, ContextBag, DepthContext, EnumContext, PathContext, TagsContext,
};
use crate::tags::{Operation, Tags};

/// Builds the context a single field is converted in.
///
/// The field starts from fresh per-field contexts, then its tags run left to
/// right. The path is extended with the normalized path the tags settled on,
/// and the depth grows by one.
///
/// # Examples
///
/// ```
/// use vc_mapper::context::{ContextBag, DepthContext, PathContext};
/// use vc_mapper::normalizer::FieldContextFiller;
/// use vc_mapper::tags::{Operation, SerializedPath, Tags};
///
/// let parent = ContextBag::new().with(PathContext::new().add("user"));
/// let tags = Tags::new().with(SerializedPath::new("meta.created"));
///
/// let field = FieldContextFiller.fill("createdAt", &tags, Operation::Normalize, &parent);
/// assert_eq!(field.get::<PathContext>().as_str(), "user.meta.created");
/// assert_eq!(field.get::<DepthContext>().depth(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldContextFiller;

impl FieldContextFiller {
    pub fn fill(
        &self,
        name: &str,
        tags: &Tags,
        operation: Operation,
        parent: &ContextBag,
    ) -> ContextBag {
        let parent_path = parent.get::<PathContext>();
        let context = parent
            .with(ArgumentContext::new(name))
            .with(TagsContext::new(tags.clone()))
            .with(EnumContext::default())
            .with(parent_path.add(name));
        let context = tags.apply(context, operation);

        let path = parent_path.add_path(context.get::<ArgumentContext>().normalized_path());
        let depth = parent.get::<DepthContext>().increase();
        context.with(path).with(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::FieldContextFiller;
    use crate::context::{ArgumentContext, ContextBag, EnumContext, PathContext, TagsContext};
    use crate::tags::{EnumOptions, Ignore, Operation, SerializedName, Tags};
    use crate::value::Value;

    #[test]
    fn untagged_field_keeps_its_name() {
        let context = FieldContextFiller.fill("id", &Tags::new(), Operation::Denormalize, &ContextBag::new());
        let argument = context.get::<ArgumentContext>();
        assert_eq!(argument.name(), "id");
        assert_eq!(argument.normalized_path(), ["id"]);
        assert_eq!(context.get::<PathContext>().as_str(), "id");
    }

    #[test]
    fn path_follows_serialized_name() {
        let parent = ContextBag::new().with(PathContext::new().add("items").item(2));
        let tags = Tags::new().with(SerializedName::new("user_id")).with(Ignore);
        let context = FieldContextFiller.fill("userId", &tags, Operation::Normalize, &parent);
        assert_eq!(context.get::<PathContext>().as_str(), "items[2].user_id");
        assert!(context.get::<ArgumentContext>().ignore());
        assert_eq!(context.get::<TagsContext>().tags().len(), 2);
    }

    #[test]
    fn parent_field_state_does_not_leak() {
        let tags = Tags::new().with(Ignore).with(EnumOptions::allow_invalid("none"));
        let parent = FieldContextFiller.fill("outer", &tags, Operation::Denormalize, &ContextBag::new());
        assert!(parent.get::<EnumContext>().allow_invalid());

        let child = FieldContextFiller.fill("inner", &Tags::new(), Operation::Denormalize, &parent);
        assert!(!child.get::<ArgumentContext>().ignore());
        assert!(!child.get::<EnumContext>().allow_invalid());
        assert_eq!(child.get::<EnumContext>().default_value(), &Value::Null);
        assert_eq!(child.get::<PathContext>().as_str(), "outer.inner");
    }
}
