/// Declares a provider's payload sum type over JSON schemas.
///
/// Every variant shares its name with the event it is decoded for, so the
/// generated `event` and `from_json` matches are exhaustive in both
/// directions.
macro_rules! json_payloads {
    (
        $(#[$meta:meta])*
        pub enum $payload:ident for $event:ident {
            $($(#[$vmeta:meta])* $variant:ident($schema:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $payload {
            $($(#[$vmeta])* $variant($schema)),+
        }

        impl $payload {
            /// Returns the event this payload was decoded for.
            pub fn event(&self) -> $event {
                match self {
                    $(Self::$variant(_) => $event::$variant),+
                }
            }

            /// Decodes the JSON body of a delivery into the schema of `event`.
            pub(crate) fn from_json(
                event: $event,
                delivery: &hookwire_core::Delivery,
            ) -> hookwire_core::Result<Self> {
                match event {
                    $($event::$variant => delivery.json().map(Self::$variant)),+
                }
            }
        }
    };
}

pub(crate) use json_payloads;
