//! Embedded standard library fragments, compiled in order.
//!
//! Host functions are bound with `__externalfn <id> <arity>`; ids are
//! part of the host ABI and must not be renumbered.

pub(super) const FRAGMENTS: &[(&str, &str)] = &[
    ("Maybe", MAYBE),
    ("Result", RESULT),
    ("List", LIST),
    ("Array", ARRAY),
    ("Math", MATH),
    ("Blob", BLOB),
    ("Int", INT),
    ("Char", CHAR),
    ("String", STRING),
    ("Debug", DEBUG),
];

/// Fragments whose types and variants are also visible unprefixed.
pub(super) const UNPREFIXED_TYPES: &[&str] = &["Maybe", "Result"];

const MAYBE: &str = "\
type Maybe a =
    Nothing
    | Just a

withDefault : a -> Maybe a -> a
withDefault default maybe =
    case maybe of
        Just value -> value
        Nothing -> default

map : (a -> b) -> Maybe a -> Maybe b
map f maybe =
    case maybe of
        Just value -> Just (f value)
        Nothing -> Nothing

andThen : (a -> Maybe b) -> Maybe a -> Maybe b
andThen f maybe =
    case maybe of
        Just value -> f value
        Nothing -> Nothing
";

const RESULT: &str = "\
type Result value error =
    Ok value
    | Err error

withDefault : a -> Result a e -> a
withDefault default result =
    case result of
        Ok value -> value
        Err _ -> default

toMaybe : Result a e -> Maybe a
toMaybe result =
    case result of
        Ok value -> Just value
        Err _ -> Nothing
";

const LIST: &str = "\
map : (a -> b) -> List a -> List b
map = __externalfn 1 2

filter : (a -> Bool) -> List a -> List a
filter = __externalfn 2 2

length : List a -> Int
length = __externalfn 3 1

head : List a -> Maybe a
head = __externalfn 4 1

isEmpty : List a -> Bool
isEmpty = __externalfn 5 1

foldl : (a -> b -> b) -> b -> List a -> b
foldl = __externalfn 6 3

range : Int -> Int -> List Int
range = __externalfn 7 2

reverse : List a -> List a
reverse = __externalfn 8 1

member : a -> List a -> Bool
member = __externalfn 9 2
";

const ARRAY: &str = "\
fromList : List a -> Array a
fromList = __externalfn 20 1

get : Int -> Array a -> Maybe a
get = __externalfn 21 2

set : Int -> a -> Array a -> Array a
set = __externalfn 22 3

length : Array a -> Int
length = __externalfn 23 1
";

const MATH: &str = "\
sin : Fixed -> Fixed
sin = __externalfn 30 1

cos : Fixed -> Fixed
cos = __externalfn 31 1

sqrt : Fixed -> Fixed
sqrt = __externalfn 32 1

abs : Int -> Int
abs = __externalfn 33 1

min : Int -> Int -> Int
min = __externalfn 34 2

max : Int -> Int -> Int
max = __externalfn 35 2

rnd : Int -> Int -> Int
rnd = __externalfn 36 2
";

const BLOB: &str = "\
length : Blob -> Int
length = __externalfn 40 1

get : Int -> Blob -> Int
get = __externalfn 41 2
";

const INT: &str = "\
toFixed : Int -> Fixed
toFixed = __externalfn 50 1

toString : Int -> String
toString = __externalfn 51 1
";

const CHAR: &str = "\
toCode : Char -> Int
toCode = __externalfn 60 1

fromCode : Int -> Char
fromCode = __externalfn 61 1
";

const STRING: &str = "\
length : String -> Int
length = __externalfn 70 1

isEmpty : String -> Bool
isEmpty = __externalfn 71 1

fromInt : Int -> String
fromInt = __externalfn 72 1
";

const DEBUG: &str = "\
log : a -> * -> a
log = __externalfn 80 2

toString : * -> String
toString = __externalfn 81 1
";
