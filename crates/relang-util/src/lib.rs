// typed indices into Vec-backed tables
//
// make_type_idx!(pub StateId, String, Node) declares `pub struct StateId(u32)`
// and lets it index `Vec<String>`, `[String]`, `Vec<Node>` and `[Node]`
#[macro_export]
macro_rules! make_type_idx {
    ($vis:vis $type_idx_name:ident, $($type_name:ty),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $type_idx_name(u32);

        impl $type_idx_name {
            $vis fn from_push<T>(vec: &mut Vec<T>, val: T) -> $type_idx_name {
                let idx = $type_idx_name::from_index(vec.len());
                vec.push(val);
                idx
            }

            $vis fn from_index(index: usize) -> $type_idx_name {
                $type_idx_name(u32::try_from(index).expect("index does not fit in u32"))
            }

            $vis fn index(self) -> usize {
                self.0 as usize
            }
        }

        $(
            impl std::ops::Index<$type_idx_name> for [$type_name] {
                type Output = $type_name;

                fn index(&self, index: $type_idx_name) -> &Self::Output {
                    &self[index.0 as usize]
                }
            }

            impl std::ops::IndexMut<$type_idx_name> for [$type_name] {
                fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                    &mut self[index.0 as usize]
                }
            }

            impl std::ops::Index<$type_idx_name> for Vec<$type_name> {
                type Output = $type_name;

                fn index(&self, index: $type_idx_name) -> &Self::Output {
                    &self.as_slice()[index]
                }
            }

            impl std::ops::IndexMut<$type_idx_name> for Vec<$type_name> {
                fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                    &mut self.as_mut_slice()[index]
                }
            }
        )+
    };
}
